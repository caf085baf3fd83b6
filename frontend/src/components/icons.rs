use yew::prelude::*;

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="icon">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_trash() -> Html {
    icon_base("M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6M10 11v6M14 11v6")
}
pub fn icon_calendar() -> Html {
    icon_base("M3 5h18v16H3zM16 3v4M8 3v4M3 10h18")
}
pub fn icon_robot() -> Html {
    icon_base("M5 8h14v11H5zM12 4v4M9 13h.01M15 13h.01M9 16h6")
}
pub fn icon_refresh() -> Html {
    icon_base("M21 12a9 9 0 11-3-6.7M21 4v5h-5")
}
pub fn icon_receipt() -> Html {
    icon_base("M5 3h14v18l-3-2-2 2-2-2-2 2-2-2-3 2zM9 8h6M9 12h6")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
