use std::ffi::OsString;

use clap::Parser;

/// The job recognises no flags: every token, hyphenated or not, is payload.
#[derive(Parser, Debug)]
#[command(
    name = "batch-job",
    about = "One-shot batch job that logs the payload it was handed",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Either one JSON document or any number of key=value tokens
    #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub payload: Vec<String>,
}

impl CliArgs {
    /// Parse the process arguments, keeping a literal `--` as payload.
    pub fn parse_payload<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_payload(argv).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_payload<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(escape_payload(argv))
    }
}

/// Insert an end-of-options marker after the binary name. clap consumes only
/// the first `--`, so every user token after it, `--` included, is a value.
fn escape_payload<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut tokens = argv.into_iter().map(Into::into);
    let bin = tokens.next().unwrap_or_else(|| OsString::from("batch-job"));
    [bin, OsString::from("--")].into_iter().chain(tokens).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Vec<String> {
        let mut full = vec!["batch-job"];
        full.extend_from_slice(argv);
        CliArgs::try_parse_payload(full).expect("payload parses").payload
    }

    #[test]
    fn no_arguments_is_an_empty_payload() {
        assert!(parse(&[]).is_empty());
    }

    #[test]
    fn tokens_are_kept_verbatim_and_in_order() {
        assert_eq!(parse(&["b=2", "a=1", " x "]), vec!["b=2", "a=1", " x "]);
    }

    #[test]
    fn hyphenated_tokens_are_payload_not_flags() {
        assert_eq!(
            parse(&["--help", "-v", "--mode=fast"]),
            vec!["--help", "-v", "--mode=fast"]
        );
    }

    #[test]
    fn double_dash_is_payload() {
        assert_eq!(parse(&["--"]), vec!["--"]);
        assert_eq!(parse(&["--", "a=1"]), vec!["--", "a=1"]);
        assert_eq!(parse(&["a=1", "--", "--"]), vec!["a=1", "--", "--"]);
    }

    #[test]
    fn missing_binary_name_still_parses() {
        let argv: [&str; 0] = [];
        assert!(CliArgs::try_parse_payload(argv).unwrap().payload.is_empty());
    }

    #[test]
    fn json_document_is_a_single_token() {
        assert_eq!(parse(&[r#"{"user":"alice"}"#]), vec![r#"{"user":"alice"}"#]);
    }
}
