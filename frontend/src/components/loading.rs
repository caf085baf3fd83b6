use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    pub show: bool,
}

/// Full-page spinner shown while a submit or delete is in flight.
#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    html! {
        <div id="loadingOverlay" class={classes!("loading-overlay", props.show.then_some("show"))}>
            <span class="spinner"></span>
        </div>
    }
}
