use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::HttpApi;
use crate::charts::{CategoryChart, MonthlyChart};
use crate::components::expense_form::ExpenseFormView;
use crate::components::expense_list::ExpenseList;
use crate::components::loading::LoadingOverlay;
use crate::components::summary::Summary;
use crate::controller::{Dashboard, DashboardEffects};
use crate::debounce::Debouncer;
use crate::model::ExpenseForm;
use crate::settings::Settings;
use crate::state::{DashboardAction, DashboardState};
use crate::toast::{ToastContext, ToastKind, ToastProvider, ToastTiming};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub settings: Rc<Settings>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let timing = ToastTiming {
        enter_delay_ms: props.settings.toast_enter_delay_ms,
        duration_ms: props.settings.toast_duration_ms,
        fade_ms: props.settings.toast_fade_ms,
    };

    html! {
        <ToastProvider timing={timing}>
            <DashboardPage settings={props.settings.clone()} />
        </ToastProvider>
    }
}

/// Controller effects backed by the page's reducers and `window.confirm`.
struct BrowserEffects {
    state: UseReducerDispatcher<DashboardState>,
    toasts: ToastContext,
}

impl DashboardEffects for BrowserEffects {
    fn apply(&self, action: DashboardAction) {
        self.state.dispatch(action);
    }

    fn notify(&self, kind: ToastKind, message: String) {
        self.toasts.show(kind, message);
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

type BrowserDashboard = Dashboard<HttpApi, BrowserEffects>;

#[function_component(DashboardPage)]
fn dashboard_page(props: &AppProps) -> Html {
    let settings = props.settings.clone();
    let state = use_reducer(DashboardState::default);
    let toasts = use_context::<ToastContext>().unwrap_or_default();

    let controller: Rc<BrowserDashboard> = {
        let effects = BrowserEffects {
            state: state.dispatcher(),
            toasts,
        };
        let settings = settings.clone();
        use_memo(
            move |_| {
                Dashboard::new(
                    HttpApi::new(settings.api_base.clone()),
                    effects,
                    settings.min_prediction_chars,
                )
            },
            (),
        )
    };

    let debouncer = use_mut_ref(|| Debouncer::new(settings.debounce_ms));

    {
        let controller = controller.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move { controller.start().await });
                || ()
            },
            (),
        );
    }

    let on_edit = {
        let dispatcher = state.dispatcher();
        Callback::from(move |action: DashboardAction| dispatcher.dispatch(action))
    };

    let on_description = {
        let dispatcher = state.dispatcher();
        let controller = controller.clone();
        let debouncer = debouncer.clone();
        Callback::from(move |value: String| {
            dispatcher.dispatch(DashboardAction::EditDescription(value.clone()));
            let controller = controller.clone();
            debouncer.borrow_mut().call(move || {
                spawn_local(async move { controller.predict(&value).await });
            });
        })
    };

    let on_submit = {
        let controller = controller.clone();
        Callback::from(move |form: ExpenseForm| {
            let mut pending = debouncer.borrow_mut();
            if pending.is_pending() {
                log::debug!("Dropping pending prediction on submit");
                pending.cancel();
            }
            let controller = controller.clone();
            spawn_local(async move { controller.submit(form).await });
        })
    };

    let on_delete = {
        let controller = controller.clone();
        Callback::from(move |id: i64| {
            let controller = controller.clone();
            spawn_local(async move { controller.delete(id).await });
        })
    };

    let on_refresh = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            let controller = controller.clone();
            spawn_local(async move { controller.reload().await });
        })
    };

    let currency_symbol = AttrValue::from(settings.currency_symbol.clone());

    html! {
        <div class="container">
            <header class="header">
                <h1>{"Smart Expense Tracker"}</h1>
                <p>{"Track your spending with AI-powered categorization"}</p>
            </header>

            <div class="dashboard">
                <section class="card">
                    <h2>{"Add New Expense"}</h2>
                    <ExpenseFormView
                        form={state.form.clone()}
                        prediction={state.prediction.clone()}
                        categories={state.categories.clone()}
                        high_confidence={settings.high_confidence}
                        busy={state.loading}
                        on_description={on_description}
                        on_edit={on_edit}
                        on_submit={on_submit} />
                </section>

                <section class="card">
                    <Summary
                        total={state.analytics.total}
                        currency_symbol={currency_symbol.clone()}
                        status={state.status}
                        on_refresh={on_refresh} />
                    <div class="charts">
                        <div class="chart-card">
                            <h3>{"Spending by Category"}</h3>
                            <CategoryChart
                                snapshot={state.analytics.clone()}
                                currency_symbol={currency_symbol.clone()} />
                        </div>
                        <div class="chart-card">
                            <h3>{"Monthly Trend"}</h3>
                            <MonthlyChart
                                snapshot={state.analytics.clone()}
                                currency_symbol={currency_symbol.clone()}
                                monthly_window={settings.monthly_window} />
                        </div>
                    </div>
                </section>

                <section class="card expenses-card">
                    <h2>{"Recent Expenses"}</h2>
                    <ExpenseList
                        expenses={state.expenses.clone()}
                        failed={state.list_failed}
                        currency_symbol={currency_symbol}
                        on_delete={on_delete} />
                </section>
            </div>

            <LoadingOverlay show={state.loading} />
        </div>
    }
}
