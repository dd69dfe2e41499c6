//! External tool plumbing: the process runner and downloader argument builders.

mod runner;
pub mod video_info;

pub use runner::{format_command, CommandOutput, SystemRunner, ToolRunner};
pub use video_info::{info_args, parse_video_info, VideoInfo, VideoInfoError};

/// Build downloader arguments for audio extraction.
///
/// Produces `<url> -x [--audio-format F] [--audio-quality Q] <extra...>`,
/// dropping each default whose flag the caller already passed (either as
/// its own token or as `--flag=value`).
pub fn audio_download_args(
    url: &str,
    audio_format: &str,
    audio_quality: &str,
    extra_args: &[String],
) -> Vec<String> {
    let defaults = [
        ("--audio-format", audio_format),
        ("--audio-quality", audio_quality),
    ];

    let mut args = vec![url.to_string(), "-x".to_string()];
    for (flag, value) in defaults {
        if !has_flag(extra_args, flag) {
            args.push(flag.to_string());
            args.push(value.to_string());
        }
    }
    args.extend(extra_args.iter().cloned());
    args
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| {
        arg == flag
            || arg
                .strip_prefix(flag)
                .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Substitute `{url}` and `{id}` in a configured argument template.
pub fn expand_template(template: &[String], url: &str, video_id: &str) -> Vec<String> {
    template
        .iter()
        .map(|arg| arg.replace("{url}", url).replace("{id}", video_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_added() {
        let args = audio_download_args("URL", "m4a", "0", &[]);
        assert_eq!(
            args,
            strings(&["URL", "-x", "--audio-format", "m4a", "--audio-quality", "0"])
        );
    }

    #[test]
    fn caller_flag_suppresses_default() {
        let extra = strings(&["--audio-quality", "5", "--embed-chapters"]);
        let args = audio_download_args("URL", "m4a", "0", &extra);
        assert_eq!(
            args,
            strings(&[
                "URL",
                "-x",
                "--audio-format",
                "m4a",
                "--audio-quality",
                "5",
                "--embed-chapters"
            ])
        );
    }

    #[test]
    fn equals_form_suppresses_default() {
        let extra = strings(&["--audio-format=opus"]);
        let args = audio_download_args("URL", "m4a", "0", &extra);
        assert!(!args.contains(&"m4a".to_string()));
        assert!(args.contains(&"--audio-quality".to_string()));
    }

    #[test]
    fn prefix_of_other_flag_does_not_suppress() {
        assert!(!has_flag(&strings(&["--audio-formats"]), "--audio-format"));
    }

    #[test]
    fn template_expands_placeholders() {
        let template = strings(&["{url}", "-o", "{id}.jpg"]);
        assert_eq!(
            expand_template(&template, "https://youtu.be/abc", "abc"),
            strings(&["https://youtu.be/abc", "-o", "abc.jpg"])
        );
    }
}
