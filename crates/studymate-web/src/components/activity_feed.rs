use studymate_core::activity::{
  EMPTY_ACTIVITY,
  display_time,
  icon_for
};
use studymate_shared::ActivityDto;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ActivityFeedProps {
  pub entries: Vec<ActivityDto>
}

/// Entries in the order the server sent
/// them, newest first.
#[function_component(ActivityFeed)]
pub fn activity_feed(
  props: &ActivityFeedProps
) -> Html {
  html! {
      <section class="card activity-feed">
          <div class="card-header">
              <i class="fas fa-history me-2"></i>{ "Actividad reciente" }
          </div>
          <ul class="list-group list-group-flush">
              if props.entries.is_empty() {
                  <li class="list-group-item text-muted">{ EMPTY_ACTIVITY }</li>
              } else {
                  { for props.entries.iter().map(|entry| {
                      let icon = format!("fas fa-{} me-2", icon_for(&entry.kind));
                      html! {
                          <li class="list-group-item">
                              <i class={icon}></i>
                              <span>{ entry.description.clone() }</span>
                              <small class="text-muted ms-2">{ display_time(entry) }</small>
                          </li>
                      }
                  }) }
              }
          </ul>
      </section>
  }
}
