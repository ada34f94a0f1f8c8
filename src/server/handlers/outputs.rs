//! Saved outputs panel.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::super::template_structs::{Notice, OutputsTemplate, TextCard};
use super::super::AppState;
use super::helpers::{render, session_id, FlashParams};
use crate::error::AppError;
use crate::logging::error_chain;
use crate::session::SessionState;
use crate::storage::ResultStore;

/// Cache key of the `index`-th listed artifact.
fn output_text_key(name: &str, index: usize) -> String {
    format!("output_{}_{}", name, index)
}

/// List every artifact in the output directory as an editable card.
pub async fn browse_outputs(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(flash): Query<FlashParams>,
) -> Response {
    let (jar, id) = session_id(jar);
    let mut notices = flash.notices();

    let cards = match state.store.list() {
        Ok(names) if names.is_empty() => {
            notices.push(Notice::info("No output files found"));
            Vec::new()
        }
        Ok(names) => state
            .sessions
            .with_session(&id, |session| output_cards(&state.store, session, &names)),
        Err(AppError::NotFound(_)) => {
            tracing::warn!("Output directory not found: {}", state.store.dir().display());
            notices.push(Notice::warning("Output directory not found"));
            Vec::new()
        }
        Err(e) => {
            let reason = error_chain(&e);
            tracing::error!(error = %reason, "Error listing output files");
            notices.push(Notice::error(format!("Error listing output files: {}", reason)));
            Vec::new()
        }
    };

    let template = OutputsTemplate {
        title: "Output Files",
        active: "outputs",
        notices,
        output_dir: state.store.dir().display().to_string(),
        cards,
    };
    (jar, render(&template)).into_response()
}

fn output_cards(store: &ResultStore, session: &mut SessionState, names: &[String]) -> Vec<TextCard> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let key = output_text_key(name, index);
            let loaded = session.texts.get_or_try_init(&key, || store.read(name));
            let (text, artifact, error) = match loaded {
                Ok(text) => (text, Some(name.clone()), None),
                Err(e) => {
                    let reason = error_chain(&e);
                    tracing::error!(error = %reason, "Error reading file {}", name);
                    (String::new(), None, Some(format!("Error reading file {}: {}", name, reason)))
                }
            };
            TextCard {
                title: name.clone(),
                key,
                artifact,
                text,
                preview: None,
                error,
                return_to: "/outputs",
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_cards_seed_once_and_keep_edits() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.write("a_output.txt", "from disk").unwrap();
        let names = store.list().unwrap();

        let mut session = SessionState::default();
        let cards = output_cards(&store, &mut session, &names);
        assert_eq!(cards[0].text, "from disk");
        assert_eq!(cards[0].key, "output_a_output.txt_0");

        session.texts.set("output_a_output.txt_0", "edited");
        store.write("a_output.txt", "changed on disk").unwrap();
        let cards = output_cards(&store, &mut session, &names);
        assert_eq!(cards[0].text, "edited");
    }

    #[test]
    fn test_unreadable_file_errors_only_its_card() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.write("good_output.txt", "ok").unwrap();
        let names = vec!["gone_output.txt".to_string(), "good_output.txt".to_string()];

        let mut session = SessionState::default();
        let cards = output_cards(&store, &mut session, &names);
        assert!(cards[0].error.is_some());
        assert!(cards[0].artifact.is_none());
        assert_eq!(cards[1].text, "ok");
        assert!(cards[1].error.is_none());
    }
}
