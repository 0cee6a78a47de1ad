//! Modal Shell
//!
//! Backdrop + dialog frame shared by every form modal.

use leptos::prelude::*;

/// Whether a form creates a new record or edits an existing one
#[derive(Clone, Debug, PartialEq)]
pub enum FormMode<T> {
    Create,
    Edit(T),
}

impl<T> FormMode<T> {
    pub fn existing(&self) -> Option<&T> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(t) => Some(t),
        }
    }

    /// "Add Provider" / "Edit Provider"
    pub fn title(&self, noun: &str) -> String {
        match self {
            FormMode::Create => format!("Add {}", noun),
            FormMode::Edit(_) => format!("Edit {}", noun),
        }
    }

    /// Toast text after a successful save
    pub fn saved_message(&self, noun: &str) -> String {
        match self {
            FormMode::Create => format!("{} created successfully", noun),
            FormMode::Edit(_) => format!("{} updated successfully", noun),
        }
    }
}

/// Clicking the backdrop or × closes the dialog
#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional)] wide: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.run(())>
            <div
                class={if wide { "modal modal-wide" } else { "modal" }}
                on:click=|ev| ev.stop_propagation()
            >
                <div class="modal-header">
                    <h2>{title}</h2>
                    <button type="button" class="modal-close" on:click=move |_| on_close.run(())>
                        "×"
                    </button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_mode_text() {
        let create: FormMode<u32> = FormMode::Create;
        assert_eq!(create.title("Item"), "Add Item");
        assert_eq!(FormMode::Edit(3).saved_message("Item"), "Item updated successfully");
        assert_eq!(FormMode::Edit(3).existing(), Some(&3));
    }
}
