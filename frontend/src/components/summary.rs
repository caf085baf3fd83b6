use yew::prelude::*;

use crate::components::icons::icon_refresh;
use crate::format::format_currency;
use crate::state::ServiceStatus;

#[derive(Properties, PartialEq)]
pub struct SummaryProps {
    pub total: f64,
    pub currency_symbol: AttrValue,
    pub status: ServiceStatus,
    pub on_refresh: Callback<()>,
}

#[function_component(Summary)]
pub fn summary(props: &SummaryProps) -> Html {
    let on_refresh = {
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| on_refresh.emit(()))
    };

    let status_class = match props.status {
        ServiceStatus::Ready => "status-ok",
        ServiceStatus::Unknown => "status-unknown",
        ServiceStatus::ModelUnavailable | ServiceStatus::Offline => "status-warn",
    };

    html! {
        <div class="summary-card">
            <div>
                <p class="summary-label">{"Total Spending"}</p>
                <h2 class="summary-total">
                    <span id="totalAmount">{ format_currency(props.total, &props.currency_symbol) }</span>
                </h2>
            </div>
            <div class="summary-actions">
                <span class={classes!("status-badge", status_class)}>{ props.status.label() }</span>
                <button id="refreshExpenses" type="button" class="btn btn-secondary" onclick={on_refresh}>
                    { icon_refresh() }{" Refresh"}
                </button>
            </div>
        </div>
    }
}
