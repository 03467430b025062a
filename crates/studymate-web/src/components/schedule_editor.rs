use studymate_core::schedule::{
  ScheduleEntry,
  ScheduleRows,
  WEEKDAYS
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

use super::field_value;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Column {
  Day,
  Start,
  End
}

fn edited(
  rows: &ScheduleRows,
  index: usize,
  column: Column,
  value: String
) -> ScheduleRows {
  let mut next = rows.clone();
  if let Some(row) = next.row_mut(index) {
    let slot: &mut String = match column {
      | Column::Day => &mut row.day,
      | Column::Start => &mut row.start,
      | Column::End => &mut row.end
    };
    *slot = value;
  }
  next
}

#[derive(Properties, PartialEq)]
pub struct ScheduleEditorProps {
  pub rows:      ScheduleRows,
  pub on_change: Callback<ScheduleRows>
}

/// Repeatable day / start / end rows of a
/// subject's timetable.
#[function_component(ScheduleEditor)]
pub fn schedule_editor(
  props: &ScheduleEditorProps
) -> Html {
  let cell = |index: usize, column: Column| {
    let rows = props.rows.clone();
    let on_change = props.on_change.clone();
    Callback::from(move |e: web_sys::Event| {
      if let Some(value) = field_value(&e) {
        on_change.emit(edited(
          &rows, index, column, value
        ));
      }
    })
  };

  let on_add = {
    let rows = props.rows.clone();
    let on_change = props.on_change.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = rows.clone();
      next.add_row();
      on_change.emit(next);
    })
  };

  let row = |index: usize, entry: &ScheduleEntry| {
    let rows = props.rows.clone();
    let on_change = props.on_change.clone();
    let on_remove = Callback::from(move |_: MouseEvent| {
      let mut next = rows.clone();
      next.remove_row(index);
      on_change.emit(next);
    });
    html! {
        <div class="row g-2 mb-2 schedule-row" key={index}>
            <div class="col-5">
                <select class="form-select" onchange={cell(index, Column::Day)}>
                    <option value="" selected={entry.day.is_empty()}>{ "Día" }</option>
                    { for WEEKDAYS.iter().map(|day| html! {
                        <option value={*day} selected={entry.day == *day}>{ *day }</option>
                    }) }
                </select>
            </div>
            <div class="col-3">
                <input class="form-control" type="time" value={entry.start.clone()} onchange={cell(index, Column::Start)} />
            </div>
            <div class="col-3">
                <input class="form-control" type="time" value={entry.end.clone()} onchange={cell(index, Column::End)} />
            </div>
            <div class="col-1">
                <button type="button" class="btn btn-outline-danger" title="Quitar" onclick={on_remove}>
                    <i class="fas fa-times"></i>
                </button>
            </div>
        </div>
    }
  };

  html! {
      <div class="schedule-editor">
          { for props.rows.rows().iter().enumerate().map(|(index, entry)| row(index, entry)) }
          <button type="button" class="btn btn-sm btn-outline-secondary" onclick={on_add}>
              <i class="fas fa-plus me-1"></i>{ "Agregar horario" }
          </button>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn editing_a_cell_touches_only_that_row() {
    let rows = ScheduleRows::from_schedule(
      Some("Lunes 08:00-10:00, Jueves 14:00-16:00")
    );
    let next = edited(
      &rows,
      1,
      Column::End,
      "17:00".into()
    );
    assert_eq!(
      next.to_schedule_string(),
      "Lunes 08:00-10:00, Jueves 14:00-17:00"
    );
    assert_eq!(
      edited(&rows, 9, Column::Day, "Martes".into()),
      rows
    );
  }
}
