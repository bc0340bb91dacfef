use std::rc::Rc;

use sage_core::aggregate::DashboardRollup;
use sage_core::api::ApiError;
use sage_core::details::event_details;
use sage_core::pills::{
  filter_pills,
  legend_entries
};
use sage_core::svg::render_svg;
use sage_core::urgency::summarize;
use sage_core::{
  CalendarConfig,
  EventCatalog,
  FilterAction,
  FilterState,
  SchoolCalendar,
  layout_gantt
};
use yew::{
  Callback,
  Html,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_reducer,
  use_state
};

use crate::api;
use crate::components::{
  CountrySummary,
  EventDrawer,
  FilterPanel,
  FilterPills,
  GanttChart,
  Legend,
  Notice,
  Toolbar,
  UrgencyBanner
};
use crate::session;

/// Page state plus the configuration the
/// reducer needs to resolve presets.
#[derive(Clone, PartialEq)]
pub struct CalendarStore {
  pub state:  FilterState,
  pub config: Rc<CalendarConfig>
}

impl CalendarStore {
  pub fn new(
    config: Rc<CalendarConfig>
  ) -> Self {
    Self {
      state: FilterState::new(
        config.today()
      ),
      config
    }
  }
}

impl Reducible for CalendarStore {
  type Action = FilterAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    tracing::debug!(?action, "calendar action");
    let state =
      self.state.apply(action, &self.config);
    if state == self.state {
      return self;
    }
    Rc::new(Self {
      state,
      config: self.config.clone()
    })
  }
}

fn seed_catalog() -> EventCatalog {
  EventCatalog::embedded().unwrap_or_else(
    |err| {
      tracing::error!(error = %err, "seed events are invalid");
      EventCatalog::default()
    }
  )
}

fn seed_school_calendar() -> SchoolCalendar {
  SchoolCalendar::embedded().unwrap_or_else(
    |err| {
      tracing::error!(error = %err, "school-year data is invalid");
      SchoolCalendar::default()
    }
  )
}

fn svg_data_url(svg: &str) -> String {
  format!(
    "data:image/svg+xml;charset=utf-8,{}",
    String::from(
      js_sys::encode_uri_component(svg)
    )
  )
}

#[function_component(App)]
pub fn app() -> Html {
  let user = use_memo((), |_| {
    session::load_user()
  });

  html! {
      <div class="app-shell">
          <header class="app-header">
              <span class="brand">{ "SAGE TA Tracker" }</span>
              {
                  match &*user {
                      | Some(user) => html! {
                          <span class="user">{ user.name.clone() }</span>
                      },
                      | None => html! {}
                  }
              }
          </header>
          <CalendarPage />
          <DashboardPanel />
      </div>
  }
}

/// Country rollup under the calendar;
/// stays hidden until the dashboard
/// endpoints answer.
#[function_component(DashboardPanel)]
pub fn dashboard_panel() -> Html {
  let rollup =
    use_state(|| None::<DashboardRollup>);

  {
    let rollup = rollup.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          match api::fetch_dashboard().await {
            | Ok(fetched) => {
              rollup.set(Some(fetched));
            }
            | Err(ApiError::NotFound(_)) => {
              tracing::info!("dashboard endpoints unavailable; hiding summary");
            }
            | Err(err) => {
              tracing::warn!(error = %err, "dashboard summary unavailable");
            }
          }
        }
      );
      || ()
    });
  }

  match (*rollup).clone() {
    | Some(rollup) => html! {
        <CountrySummary rollup={rollup} />
    },
    | None => html! {}
  }
}

#[function_component(CalendarPage)]
pub fn calendar_page() -> Html {
  let config = use_memo((), |_| {
    CalendarConfig::embedded()
  });
  let school = use_memo((), |_| {
    seed_school_calendar()
  });
  let catalog =
    use_state(|| Rc::new(seed_catalog()));
  let notice =
    use_state(|| None::<String>);
  let store = {
    let config = config.clone();
    use_reducer(move || {
      CalendarStore::new(config)
    })
  };

  {
    let catalog = catalog.clone();
    let notice = notice.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          match api::fetch_calendar_events()
            .await
          {
            | Ok(fetched)
              if !fetched.is_empty() =>
            {
              catalog.set(Rc::new(fetched));
            }
            | Ok(_) => {
              tracing::info!("calendar endpoint returned no events; keeping seed");
            }
            | Err(ApiError::NotFound(_)) => {
              tracing::info!("calendar endpoint unavailable; using seed events");
            }
            | Err(err) => {
              tracing::warn!(error = %err, "using seed events");
              notice.set(Some(
                err.user_message()
              ));
            }
          }
        }
      );
      || ()
    });
  }

  let dispatch = {
    let store = store.clone();
    Callback::from(
      move |action: FilterAction| {
        store.dispatch(action);
      }
    )
  };
  let on_dismiss_notice = {
    let notice = notice.clone();
    Callback::from(move |()| {
      notice.set(None);
    })
  };

  let state = &store.state;
  let reference = state.reference_date;
  let applied = state.applied(&config);
  let visible =
    applied.visible_events(catalog.events());
  let summary = summarize(
    visible.iter().copied(),
    reference,
    config.urgency.lookahead_days
  );
  let layout = layout_gantt(
    catalog.events(),
    &applied,
    reference,
    &config,
    &school
  );
  let export_href = svg_data_url(
    &render_svg(&layout, &config)
  );
  let details =
    state.selected_event.as_deref().and_then(
      |id| {
        event_details(
          &catalog, id, reference, &config
        )
      }
    );

  html! {
      <div class="calendar-page">
          {
              match (*notice).clone() {
                  | Some(message) => html! {
                      <Notice message={message} on_dismiss={on_dismiss_notice} />
                  },
                  | None => html! {}
              }
          }
          <UrgencyBanner summary={summary} />
          <Toolbar
              state={state.clone()}
              presets={config.presets.clone()}
              today={config.today()}
              export_href={export_href}
              on_action={dispatch.clone()}
          />
          <div class="calendar-body">
              <FilterPanel
                  state={state.clone()}
                  colors={config.colors.clone()}
                  on_action={dispatch.clone()}
              />
              <div class="calendar-main">
                  <FilterPills
                      pills={filter_pills(state, &config)}
                      visible_count={visible.len()}
                      on_action={dispatch.clone()}
                  />
                  <GanttChart
                      layout={layout}
                      config={config.clone()}
                      selected={state.selected_event.clone()}
                      on_action={dispatch.clone()}
                  />
                  <Legend entries={legend_entries(&config)} />
              </div>
              <EventDrawer details={details} on_action={dispatch} />
          </div>
      </div>
  }
}
