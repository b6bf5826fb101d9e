//! Defines the route handler for the page for creating an account.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    account::AccountKind,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, dollar_input_styles, loading_spinner,
    },
};

fn create_account_view() -> Markup {
    let spinner = loading_spinner();

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::ACCOUNTS_API)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Account" }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Account Name" }

                    input
                        name="name"
                        id="name"
                        type="text"
                        placeholder="e.g. Everyday"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Account Type" }

                    select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for kind in [AccountKind::Current, AccountKind::Savings] {
                            option value=(kind.as_str()) { (kind.label()) }
                        }
                    }
                }

                div
                {
                    label for="balance" class=(FORM_LABEL_STYLE) { "Initial Balance" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="balance"
                            id="balance"
                            type="number"
                            step="0.01"
                            placeholder="0.00"
                            value="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="flex items-center gap-2"
                {
                    input
                        name="is_default"
                        id="is_default"
                        type="checkbox"
                        value="true"
                        class=(FORM_CHECKBOX_STYLE);

                    label for="is_default" class="text-sm text-gray-900 dark:text-white"
                    {
                        "Set as default account"
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Create Account"
                }
            }
        }
    };

    base("Create Account", endpoints::NEW_ACCOUNT_VIEW, &[dollar_input_styles()], &content)
}

/// Renders the page for creating an account.
pub async fn get_create_account_page() -> Response {
    create_account_view().into_response()
}
