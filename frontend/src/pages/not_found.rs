use yew::prelude::*;

use super::chat::DEFAULT_DASHBOARD_URL;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="not-found-container">
            <div class="not-found-content">
                <div class="not-found-icon">{ "\u{1F50D}" }</div>
                <h1>{ "Page Not Found" }</h1>
                <p class="not-found-message">
                    { "There is nothing at this address." }
                </p>
                <p class="not-found-contact">
                    { "Open a chat from the " }
                    <a href={DEFAULT_DASHBOARD_URL}>{ "events dashboard" }</a>
                    { "." }
                </p>
            </div>
        </div>
    }
}
