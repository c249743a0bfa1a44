use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::engine::{CandidateSet, PromptEngine, RemoteStatus, Suggestions};
use crate::error::Result;
use crate::remote::CandidateSource;
use crate::speller::SpellingOracle;

/// Line-oriented search prompt.
///
/// Each line is a new query. `:N` takes candidate `N` as the new query and
/// asks again, an empty line repeats the current query, `exit` quits.
pub async fn run<O, S, R, W>(engine: &PromptEngine<O, S>, input: R, mut output: W) -> Result<()>
where
    O: SpellingOracle,
    S: CandidateSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"Search for movie (':N' to select a prompt, 'exit' to quit)\n")
        .await?;

    let mut lines = input.lines();
    let mut query = String::new();
    let mut shown: Option<CandidateSet> = None;

    loop {
        output.write_all(b"\n> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim_end_matches('\r');

        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        if let Some(choice) = line.strip_prefix(':') {
            match pick(shown.as_ref(), choice) {
                Some(phrase) => query = phrase,
                None => {
                    let msg = format!("No prompt '{}' to select.\n", choice.trim());
                    output.write_all(msg.as_bytes()).await?;
                    continue;
                }
            }
        } else if !line.is_empty() {
            query = line.to_string();
        }

        let suggestions = engine.generate_candidates(&query).await?;
        output.write_all(render(&query, &suggestions).as_bytes()).await?;
        shown = Some(suggestions.candidates);
    }

    output.flush().await?;
    Ok(())
}

/// Candidate selected by a 1-based `:N` command.
fn pick(shown: Option<&CandidateSet>, choice: &str) -> Option<String> {
    let n: usize = choice.trim().parse().ok()?;
    shown?.get(n.checked_sub(1)?).map(str::to_string)
}

fn render(query: &str, suggestions: &Suggestions) -> String {
    let mut out = format!("Prompts for '{query}':\n");
    if suggestions.candidates.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, phrase) in suggestions.candidates.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, phrase));
    }
    if let RemoteStatus::Unavailable(reason) = &suggestions.remote {
        out.push_str(&format!("  (inference service unavailable: {reason})\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RemoteFailurePolicy;
    use crate::error::Error;
    use crate::indexer::DatasetIndex;
    use crate::indexer::dataset::Record;
    use crate::speller::EditDistanceSpeller;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Echo {
        down: bool,
        queries: Mutex<Vec<String>>,
    }

    impl CandidateSource for Echo {
        async fn fetch_candidates(&self, query: &str, _count: usize) -> Result<Vec<String>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.down {
                return Err(Error::Status(reqwest::StatusCode::BAD_GATEWAY));
            }
            Ok(vec![format!("{query} reloaded")])
        }
    }

    fn engine(source: Echo) -> PromptEngine<EditDistanceSpeller, Echo> {
        let records = vec![
            Record { title: "The Matrix".into(), rating: Some("8.7".into()) },
            Record { title: "The Matrix Reloaded".into(), rating: Some("7.2".into()) },
        ];
        PromptEngine::new(Arc::new(DatasetIndex::from_records(&records)), EditDistanceSpeller, source)
    }

    async fn session(engine: &PromptEngine<EditDistanceSpeller, Echo>, input: &str) -> Result<String> {
        let mut out = Vec::new();
        run(engine, input.as_bytes(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_numbered_prompts() {
        let engine = engine(Echo::default());
        let out = session(&engine, "teh matriks\nexit\n").await.unwrap();

        assert!(out.contains("Prompts for 'teh matriks':"), "{out}");
        assert!(out.contains("  1. teh matrix\n"));
        assert!(out.contains("  2. the matrix\n"));
        assert!(out.contains("  3. the matrix reloaded\n"));
    }

    #[tokio::test]
    async fn selecting_a_prompt_requeries_with_it() {
        let engine = engine(Echo::default());
        let out = session(&engine, "teh matriks\n:3\n").await.unwrap();

        assert!(out.contains("Prompts for 'the matrix reloaded':"), "{out}");
        assert_eq!(
            *engine_queries(&engine),
            vec!["the matrix".to_string(), "the matrix reloaded".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_line_repeats_and_bad_selection_is_reported() {
        let engine = engine(Echo::default());
        let out = session(&engine, ":1\nheat\n\n:9\n:x\n").await.unwrap();

        assert!(out.contains("No prompt '1' to select."));
        assert!(out.contains("No prompt '9' to select."));
        assert!(out.contains("No prompt 'x' to select."));
        assert_eq!(out.matches("Prompts for 'heat':").count(), 2);
    }

    #[tokio::test]
    async fn strict_failure_ends_the_session() {
        let engine = engine(Echo { down: true, ..Default::default() });
        let err = session(&engine, "heat\n").await.unwrap_err();
        assert!(matches!(err, Error::Status(_)));
    }

    #[tokio::test]
    async fn degraded_failure_is_shown() {
        let engine = engine(Echo { down: true, ..Default::default() })
            .with_policy(RemoteFailurePolicy::Degraded);
        let out = session(&engine, "teh matriks\n").await.unwrap();

        assert!(out.contains("  1. teh matrix\n"));
        assert!(out.contains("inference service unavailable"));
    }

    fn engine_queries(engine: &PromptEngine<EditDistanceSpeller, Echo>) -> std::sync::MutexGuard<'_, Vec<String>> {
        engine.source().queries.lock().unwrap()
    }
}
