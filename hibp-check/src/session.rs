use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use hibp_range::{RangeSource, check_password};
use indicatif::ProgressBar;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::Error;
use crate::outcome::{FailurePolicy, Outcome};

const PROMPT: &str = "Enter your password: ";

/// Where passwords to check come from.
pub trait PasswordInput {
    /// The next password, or `None` once input is exhausted.
    fn next_password(&mut self) -> impl Future<Output = Result<Option<String>, Error>>;
}

/// Piped input: one password per line, with `\n` or `\r\n` stripped.
impl<R: AsyncBufRead + Unpin> PasswordInput for Lines<R> {
    async fn next_password(&mut self) -> Result<Option<String>, Error> {
        Ok(self.next_line().await?)
    }
}

/// Interactive input read from the terminal with echo disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordInput for TerminalPrompt {
    async fn next_password(&mut self) -> Result<Option<String>, Error> {
        let read = tokio::task::spawn_blocking(|| rpassword::prompt_password(PROMPT))
            .await
            .map_err(|e| Error::Io(io::Error::other(format!("Password prompt panicked: {e}"))))?;
        prompt_result(read)
    }
}

fn prompt_result(read: io::Result<String>) -> Result<Option<String>, Error> {
    match read {
        Ok(password) => Ok(Some(password)),
        // Ctrl-D at the prompt
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Spinner shown while a check is in flight. Hidden when `enabled` is false.
pub fn spinner(enabled: bool) -> ProgressBar {
    if enabled { ProgressBar::new_spinner() } else { ProgressBar::hidden() }
}

/// Runs one check with `progress` spinning for its duration.
///
/// The spinner is cleared whether the check succeeds or fails.
pub async fn check_with_progress<S: RangeSource>(
    source: &S,
    password: &str,
    policy: FailurePolicy,
    progress: &ProgressBar,
) -> Outcome {
    progress.set_message("Checking...");
    progress.enable_steady_tick(Duration::from_millis(100));

    let result = check_password(source, password).await;

    progress.finish_and_clear();
    Outcome::from_check(result, policy)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions {
    pub policy: FailurePolicy,
    /// One JSON object per password instead of text.
    pub json: bool,
    pub show_progress: bool,
}

/// Checks every non-empty password from `input` and writes each outcome to
/// `out`.
///
/// Passwords are otherwise used exactly as read, surrounding whitespace
/// included. Fails with [`Error::EmptyPassword`] if nothing was checked.
pub async fn run<I, S, W>(
    input: &mut I,
    source: &S,
    options: RunOptions,
    out: &mut W,
) -> Result<Summary, Error>
where
    I: PasswordInput,
    S: RangeSource,
    W: Write,
{
    let mut summary = Summary::default();

    // Checks run one after another, so only one request is ever in flight.
    while let Some(password) = input.next_password().await? {
        if password.is_empty() {
            continue;
        }

        let progress = spinner(options.show_progress);
        let outcome = check_with_progress(source, &password, options.policy, &progress).await;
        summary.record(&outcome);

        if options.json {
            writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
        } else {
            writeln!(out, "{outcome}")?;
        }
    }

    if summary.total() == 0 {
        return Err(Error::EmptyPassword);
    }

    Ok(summary)
}

/// Running tally of outcomes, used for the process exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub breached: usize,
    pub safe: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Breached { .. } => self.breached += 1,
            Outcome::Safe => self.safe += 1,
            Outcome::CheckFailed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.breached + self.safe + self.failed
    }

    /// `2` if any check failed, else `1` if any password was breached, else `0`.
    pub fn exit_status(&self) -> u8 {
        if self.failed > 0 {
            2
        } else if self.breached > 0 {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hibp_range::{Error as RangeError, PasswordHash, RangePrefix};
    use tokio::io::BufReader;

    use super::*;

    struct StaticRange {
        body: &'static str,
        requested: Mutex<Vec<String>>,
    }

    impl StaticRange {
        fn new(body: &'static str) -> Self {
            Self { body, requested: Mutex::new(Vec::new()) }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl RangeSource for StaticRange {
        async fn fetch_range(&self, prefix: RangePrefix) -> Result<String, RangeError> {
            self.requested.lock().unwrap().push(prefix.to_string());
            Ok(self.body.to_string())
        }
    }

    struct FailingRange;

    impl RangeSource for FailingRange {
        async fn fetch_range(&self, prefix: RangePrefix) -> Result<String, RangeError> {
            Err(RangeError::HttpStatus { prefix: prefix.to_string(), status: 502 })
        }
    }

    const BODY: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8:3730471\n";

    fn lines(input: &'static str) -> Lines<BufReader<&'static [u8]>> {
        BufReader::new(input.as_bytes()).lines()
    }

    async fn run_text<S: RangeSource>(
        input: &'static str,
        source: &S,
        options: RunOptions,
    ) -> (Result<Summary, Error>, String) {
        let mut out = Vec::new();
        let result = run(&mut lines(input), source, options, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_breached_clears_spinner() {
        let progress = ProgressBar::hidden();
        let outcome = check_with_progress(
            &StaticRange::new(BODY),
            "password",
            FailurePolicy::AssumeSafe,
            &progress,
        )
        .await;
        assert_eq!(outcome, Outcome::Breached { count: 3730471 });
        assert!(progress.is_finished());
    }

    #[tokio::test]
    async fn test_failure_shows_safe_and_clears_spinner() {
        let progress = ProgressBar::hidden();
        let outcome =
            check_with_progress(&FailingRange, "password", FailurePolicy::AssumeSafe, &progress).await;
        assert_eq!(outcome, Outcome::Safe);
        assert!(progress.is_finished());
    }

    #[tokio::test]
    async fn test_failure_reported_when_strict() {
        let progress = ProgressBar::hidden();
        let outcome =
            check_with_progress(&FailingRange, "password", FailurePolicy::Report, &progress).await;
        assert!(matches!(outcome, Outcome::CheckFailed { .. }));
        assert!(progress.is_finished());
    }

    #[tokio::test]
    async fn test_overflowing_count_is_still_breached() {
        let source = StaticRange::new("1E4C9B93F3F0682250B6CF8331B7EE68FD8:99999999999999999999999\n");
        let progress = ProgressBar::hidden();
        let outcome =
            check_with_progress(&source, "password", FailurePolicy::AssumeSafe, &progress).await;
        assert_eq!(outcome, Outcome::Breached { count: u64::MAX });
    }

    #[tokio::test]
    async fn test_run_strips_crlf() {
        let source = StaticRange::new(BODY);
        let (result, out) = run_text("password\r\n", &source, RunOptions::default()).await;

        assert_eq!(result.unwrap(), Summary { breached: 1, safe: 0, failed: 0 });
        assert_eq!(out, "Password Has Been Compromised!\nFound in 3,730,471 data breaches\n");
        assert_eq!(source.requested(), vec!["5BAA6".to_string()]);
    }

    #[tokio::test]
    async fn test_run_skips_blank_lines() {
        let source = StaticRange::new(BODY);
        let (result, _) = run_text("\n\npassword\n\r\n\n", &source, RunOptions::default()).await;

        assert_eq!(result.unwrap().total(), 1);
        assert_eq!(source.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_run_keeps_surrounding_whitespace() {
        let source = StaticRange::new(BODY);
        let (result, out) = run_text(" password \n", &source, RunOptions::default()).await;

        assert_eq!(result.unwrap(), Summary { breached: 0, safe: 1, failed: 0 });
        assert!(out.starts_with("Password Appears Safe!"));
        assert_eq!(source.requested(), vec![PasswordHash::of(" password ").prefix().to_string()]);
    }

    #[tokio::test]
    async fn test_run_without_passwords() {
        let source = StaticRange::new(BODY);

        let (result, out) = run_text("\n\r\n\n", &source, RunOptions::default()).await;
        assert!(matches!(result, Err(Error::EmptyPassword)));
        assert!(out.is_empty());

        let (result, _) = run_text("", &source, RunOptions::default()).await;
        assert!(matches!(result, Err(Error::EmptyPassword)));
        assert!(source.requested().is_empty());
    }

    #[tokio::test]
    async fn test_run_json_lines() {
        let source = StaticRange::new(BODY);
        let options = RunOptions { json: true, ..RunOptions::default() };
        let (result, out) = run_text("password\nhunter2\n", &source, options).await;

        assert_eq!(result.unwrap(), Summary { breached: 1, safe: 1, failed: 0 });
        assert_eq!(out, "{\"status\":\"breached\",\"count\":3730471}\n{\"status\":\"safe\"}\n");
    }

    #[tokio::test]
    async fn test_run_failure_policy() {
        let (result, out) = run_text("password\n", &FailingRange, RunOptions::default()).await;
        assert_eq!(result.unwrap().exit_status(), 0);
        assert!(out.starts_with("Password Appears Safe!"));

        let options = RunOptions { policy: FailurePolicy::Report, ..RunOptions::default() };
        let (result, out) = run_text("password\n", &FailingRange, options).await;
        assert_eq!(result.unwrap().exit_status(), 2);
        assert!(out.starts_with("Password Check Failed"));
    }

    #[test]
    fn test_summary_exit_status() {
        let mut summary = Summary::default();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.exit_status(), 0);

        summary.record(&Outcome::Safe);
        assert_eq!(summary.exit_status(), 0);

        summary.record(&Outcome::Breached { count: 1 });
        assert_eq!(summary.exit_status(), 1);

        summary.record(&Outcome::CheckFailed { reason: "timeout".into() });
        assert_eq!(summary.exit_status(), 2);
        assert_eq!(summary, Summary { breached: 1, safe: 1, failed: 1 });
    }

    #[test]
    fn test_prompt_result() {
        assert_eq!(prompt_result(Ok("hunter2".into())).unwrap(), Some("hunter2".to_string()));

        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of file");
        assert_eq!(prompt_result(Err(eof)).unwrap(), None);

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "no tty");
        assert!(matches!(prompt_result(Err(denied)), Err(Error::Io(_))));
    }

    #[test]
    fn test_hidden_spinner() {
        assert!(spinner(false).is_hidden());
    }
}
