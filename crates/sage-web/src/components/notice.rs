use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
  pub message:    String,
  pub on_dismiss: Callback<()>
}

#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
  let on_dismiss = props.on_dismiss.clone();

  html! {
      <div class="toast error" role="alert">
          <span>{ props.message.clone() }</span>
          <button class="btn ghost" onclick={move |_| on_dismiss.emit(())}>{ "Dismiss" }</button>
      </div>
  }
}
