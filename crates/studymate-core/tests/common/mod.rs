#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use studymate_core::api::{
    ApiClient, ApiRequest, ApiResponse, Method, Transport, TransportError,
};
use studymate_core::notify::NoticeLevel;
use studymate_core::resource::Resource;
use studymate_core::workflow::{EntityView, Feedback};

pub const BASE: &str = "http://api.test/api";

struct Scripted {
    method: Method,
    path: String,
    reply: Result<ApiResponse, TransportError>,
}

/// In-memory transport that records every request and answers from a
/// queue of scripted replies. Unscripted requests get a bare 404.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Rc<RefCell<Vec<ApiRequest>>>,
    script: Rc<RefCell<Vec<Scripted>>>,
}

impl RecordingTransport {
    pub fn reply(&self, method: Method, path: &str, status: u16, body: &str) {
        self.script.borrow_mut().push(Scripted {
            method,
            path: path.to_string(),
            reply: Ok(ApiResponse {
                status,
                body: body.to_string(),
            }),
        });
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.script.borrow_mut().push(Scripted {
            method,
            path: path.to_string(),
            reply: Err(TransportError("connection refused".to_string())),
        });
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        let url = format!("{BASE}{path}");
        self.sent()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());

        let mut script = self.script.borrow_mut();
        let position = script.iter().position(|s| {
            s.method == request.method && request.url == format!("{BASE}{}", s.path)
        });

        match position {
            Some(index) => script.remove(index).reply,
            None => Ok(ApiResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

pub fn client(transport: &RecordingTransport) -> ApiClient<RecordingTransport> {
    ApiClient::new(transport.clone(), BASE).with_token(Some("tok".to_string()))
}

/// Records every UI effect a workflow asks for, in order.
#[derive(Default)]
pub struct RecordingView {
    pub events: RefCell<Vec<String>>,
    pub notices: RefCell<Vec<(NoticeLevel, String)>>,
    pub shown: RefCell<Vec<usize>>,
    pub decline: Cell<bool>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn last_notice(&self) -> Option<(NoticeLevel, String)> {
        self.notices.borrow().last().cloned()
    }
}

impl Feedback for RecordingView {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.events.borrow_mut().push(format!("notify:{}", level.class()));
        self.notices
            .borrow_mut()
            .push((level, message.to_string()));
    }

    fn loading(&self, active: bool) {
        self.events.borrow_mut().push(format!("loading:{active}"));
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.events.borrow_mut().push("confirm".to_string());
        !self.decline.get()
    }

    fn activity_logged(&self) {
        self.events.borrow_mut().push("activity".to_string());
    }
}

impl<R: Resource> EntityView<R> for RecordingView {
    fn close_form(&self) {
        self.events.borrow_mut().push("close".to_string());
    }

    fn show_records(&self, records: Vec<R::Record>) {
        self.events
            .borrow_mut()
            .push(format!("show:{}", records.len()));
        self.shown.borrow_mut().push(records.len());
    }
}
