//! Contact page: a visitor-facing message form.
//!
//! Submission is a mutation; on failure the filled fields stay in place
//! so the visitor can correct and resend.

use crate::api::{keys, ClubApi, ContactDraft, ContactMessage};
use crate::notify::Toasts;
use crate::pages::{Intent, PageState, Reducer};
use crate::query::{KeyFilter, Mutation, QueryClient};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactFormState {
    pub name: String,
    pub email: String,
    pub text: String,
    /// Set after a successful send; the fields are blank again.
    pub sent: bool,
    pub error: Option<String>,
}

impl PageState for ContactFormState {}

#[derive(Debug)]
pub enum ContactFormIntent {
    SetName(String),
    SetEmail(String),
    SetText(String),
    Sent,
    SendFailed(String),
}

impl Intent for ContactFormIntent {}

pub struct ContactFormReducer;

impl Reducer for ContactFormReducer {
    type State = ContactFormState;
    type Intent = ContactFormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ContactFormIntent::SetName(name) => ContactFormState {
                name,
                error: None,
                sent: false,
                ..state
            },
            ContactFormIntent::SetEmail(email) => ContactFormState {
                email,
                error: None,
                sent: false,
                ..state
            },
            ContactFormIntent::SetText(text) => ContactFormState {
                text,
                error: None,
                sent: false,
                ..state
            },
            ContactFormIntent::Sent => ContactFormState {
                sent: true,
                ..ContactFormState::default()
            },
            ContactFormIntent::SendFailed(message) => ContactFormState {
                error: Some(message),
                sent: false,
                ..state
            },
        }
    }
}

impl ContactFormState {
    /// A draft ready to send, or what is missing.
    pub fn draft(&self) -> Result<ContactDraft, String> {
        if self.name.trim().is_empty() {
            return Err("Укажите имя".to_string());
        }
        if !self.email.contains('@') {
            return Err("Укажите корректный email".to_string());
        }
        if self.text.trim().is_empty() {
            return Err("Сообщение не может быть пустым".to_string());
        }
        Ok(ContactDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            text: self.text.trim().to_string(),
        })
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Имя: {}", self.name),
            format!("Email: {}", self.email),
            format!("Сообщение: {}", self.text),
        ];
        if self.sent {
            lines.push("Сообщение отправлено".to_string());
        }
        if let Some(error) = &self.error {
            lines.push(format!("Ошибка: {error}"));
        }
        lines
    }
}

/// The send-message mutation. Success refreshes the admin inbox list.
pub fn send_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
) -> Mutation<ContactDraft, ContactMessage> {
    let api = api.clone();
    Mutation::builder(queries.clone(), toasts.clone(), move |draft: ContactDraft| {
        let api = api.clone();
        async move { api.send_message(&draft).await }
    })
    .invalidate(KeyFilter::prefix(keys::messages()))
    .success_toast("Сообщение отправлено")
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactFormState {
        let state = ContactFormState::default();
        let state =
            ContactFormReducer::reduce(state, ContactFormIntent::SetName("Иван".to_string()));
        let state = ContactFormReducer::reduce(
            state,
            ContactFormIntent::SetEmail("ivan@example.com".to_string()),
        );
        ContactFormReducer::reduce(state, ContactFormIntent::SetText("Привет".to_string()))
    }

    #[test]
    fn complete_form_builds_a_draft() {
        let draft = filled().draft().unwrap();
        assert_eq!(draft.name, "Иван");
        assert_eq!(draft.email, "ivan@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        let state = ContactFormReducer::reduce(
            filled(),
            ContactFormIntent::SetEmail("not-an-email".to_string()),
        );
        assert!(state.draft().is_err());
    }

    #[test]
    fn failure_keeps_the_typed_fields() {
        let state =
            ContactFormReducer::reduce(filled(), ContactFormIntent::SendFailed("500".to_string()));
        assert_eq!(state.name, "Иван");
        assert_eq!(state.text, "Привет");
        assert_eq!(state.error.as_deref(), Some("500"));
        assert!(!state.sent);
    }

    #[test]
    fn success_clears_the_form() {
        let state = ContactFormReducer::reduce(filled(), ContactFormIntent::Sent);
        assert!(state.sent);
        assert!(state.name.is_empty());
        assert!(state.text.is_empty());
        assert_eq!(state.error, None);
    }
}
