//! Interactive prompts and wordlist loading

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Prompt for one trimmed line; `exit`/`quit` collapse to `"exit"`.
pub fn read_line(prompt: &str) -> String {
    print!("{prompt} ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    let text = line.trim().to_string();

    if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
        "exit".to_string()
    } else {
        text
    }
}

/// Prompt for a number, falling back to `default` on empty or bad input.
pub fn read_usize_with_default(prompt: &str, default: usize) -> usize {
    print!("{prompt} (default: {default}) ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line.trim().parse().unwrap_or(default)
}

/// Prompt for `key:value` header lines until an empty line.
pub fn read_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();

    println!("Enter custom headers (key:value) - press Enter when done:");
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        match line.split_once(':') {
            Some((key, value)) => {
                headers.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => println!("Invalid format. Use key:value"),
        }
    }
    headers
}

/// Expand `$VAR`/`${VAR}` and a leading `~` in a user-supplied path.
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = expand_env(path);

    if let Some(rest) = expanded.strip_prefix('~') {
        let home = dirs::home_dir().context("could not determine home directory")?;
        return if rest.is_empty() {
            Ok(home)
        } else if let Some(tail) = rest.strip_prefix('/') {
            Ok(home.join(tail))
        } else {
            bail!("unsupported path with ~username: {path}")
        };
    }

    Ok(PathBuf::from(expanded))
}

fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        }
        match std::env::var(&name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {} // unset variables expand to nothing, like the shell
        }
    }
    out
}

/// Load per-field wordlists
///
/// Each value is a file path unless double-quoted, in which case it is a
/// literal constant used for every request. Returns the field → lines map
/// and the length of the shortest list.
pub fn read_wordlists(
    field_files: &HashMap<String, String>,
) -> Result<(HashMap<String, Vec<String>>, usize)> {
    let mut out = HashMap::new();
    let mut min_len: Option<usize> = None;

    for (field, value) in field_files {
        let value = value.trim();

        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            out.insert(field.clone(), vec![value[1..value.len() - 1].to_string()]);
            min_len = Some(min_len.map_or(1, |m| m.min(1)));
            continue;
        }

        let path = expand_path(value)?;
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let lines: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        min_len = Some(min_len.map_or(lines.len(), |m| m.min(lines.len())));
        out.insert(field.clone(), lines);
    }

    Ok((out, min_len.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("VOLLEY_TEST_DIR", "/data");
        assert_eq!(expand_env("$VOLLEY_TEST_DIR/lists"), "/data/lists");
        assert_eq!(expand_env("${VOLLEY_TEST_DIR}/lists"), "/data/lists");
        assert_eq!(expand_env("no vars here"), "no vars here");
        assert_eq!(expand_env("$VOLLEY_UNSET_VAR/x"), "/x");
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_path("~").unwrap(), home);
        assert_eq!(expand_path("~/lists/a.txt").unwrap(), home.join("lists/a.txt"));
        assert!(expand_path("~other/x").is_err());
    }

    #[test]
    fn test_read_wordlists_files_and_literals() {
        let dir = tempfile::tempdir().unwrap();
        let list_path = dir.path().join("emails.txt");
        let mut file = std::fs::File::create(&list_path).unwrap();
        writeln!(file, "a@x.com\n\n  b@x.com  \nc@x.com").unwrap();

        let mut field_files = HashMap::new();
        field_files.insert(
            "email".to_string(),
            list_path.to_string_lossy().into_owned(),
        );
        field_files.insert("type".to_string(), "\"login\"".to_string());

        let (lists, min_len) = read_wordlists(&field_files).unwrap();
        assert_eq!(lists["email"], vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert_eq!(lists["type"], vec!["login"]);
        assert_eq!(min_len, 1);
    }

    #[test]
    fn test_read_wordlists_missing_file() {
        let mut field_files = HashMap::new();
        field_files.insert("email".to_string(), "/nonexistent/list.txt".to_string());
        assert!(read_wordlists(&field_files).is_err());
    }
}
