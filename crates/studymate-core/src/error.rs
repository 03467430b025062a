use thiserror::Error;

pub const CONNECTION_ERROR: &str =
  "Error de conexión";

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum ApiError {
  #[error(
    "request rejected with status \
     {status}"
  )]
  Rejected {
    status:  u16,
    message: Option<String>
  },
  #[error("transport error: {0}")]
  Transport(String),
  #[error(
    "failed to decode response: {0}"
  )]
  Decode(String)
}

impl ApiError {
  /// Text shown to the user. Server
  /// provided reasons win over the
  /// fallback; transport failures always
  /// read as a connection error.
  pub fn user_message(
    &self,
    fallback: &str
  ) -> String {
    match self {
      | ApiError::Rejected {
        message: Some(message),
        ..
      } => message.clone(),
      | ApiError::Transport(_) => {
        CONNECTION_ERROR.to_string()
      }
      | _ => fallback.to_string()
    }
  }

  pub fn is_transport(&self) -> bool {
    matches!(self, ApiError::Transport(_))
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
#[error("{message}")]
pub struct ValidationError {
  pub field:   &'static str,
  pub message: String
}

impl ValidationError {
  pub fn required(
    field: &'static str,
    message: impl Into<String>
  ) -> Self {
    Self {
      field,
      message: message.into()
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum AuthError {
  #[error("Las contraseñas no coinciden")]
  PasswordMismatch,
  #[error("{0}")]
  Invalid(ValidationError),
  #[error(transparent)]
  Api(#[from] ApiError)
}

impl AuthError {
  pub fn user_message(&self) -> String {
    match self {
      | AuthError::Api(err) => err
        .user_message(
          "Error de autenticación"
        ),
      | other => other.to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn user_message_prefers_server_reason()
  {
    let rejected = ApiError::Rejected {
      status:  400,
      message: Some(
        "Email ya registrado".to_string()
      )
    };
    assert_eq!(
      rejected.user_message("fallback"),
      "Email ya registrado"
    );

    let bare = ApiError::Rejected {
      status:  500,
      message: None
    };
    assert_eq!(
      bare.user_message("fallback"),
      "fallback"
    );

    let offline = ApiError::Transport(
      "dns".to_string()
    );
    assert_eq!(
      offline.user_message("fallback"),
      CONNECTION_ERROR
    );
  }

  #[test]
  fn auth_errors_render_localized_text() {
    assert_eq!(
      AuthError::PasswordMismatch
        .user_message(),
      "Las contraseñas no coinciden"
    );
    assert_eq!(
      AuthError::Api(ApiError::Rejected {
        status:  401,
        message: None
      })
      .user_message(),
      "Error de autenticación"
    );
  }
}
