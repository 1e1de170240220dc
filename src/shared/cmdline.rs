// Copyright 2025 the Launchpad Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Splits a container command override into individual arguments.
///
/// Whitespace separates arguments unless it appears inside single or double
/// quotes; a backslash escapes the next character outside single quotes.
/// Quotes are stripped from the produced arguments.
pub struct CommandLineTokenizer {
    args: Vec<String>,
}

impl CommandLineTokenizer {
    pub fn new(command: &str) -> Self {
        Self {
            args: tokenize(command),
        }
    }

    pub fn args(self) -> Vec<String> {
        self.args
    }
}

fn tokenize(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some('"') => match c {
                '"' => quote = None,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push(c),
            },
            _ => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_arg = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_arg = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_arg {
                        args.push(std::mem::take(&mut current));
                        in_arg = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_arg = true;
                }
            },
        }
    }

    if in_arg {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        let args = CommandLineTokenizer::new("sh -c ls").args();
        assert_eq!(args, vec!["sh", "-c", "ls"]);
    }

    #[test]
    fn empty_command_yields_no_args() {
        assert!(CommandLineTokenizer::new("").args().is_empty());
        assert!(CommandLineTokenizer::new("   ").args().is_empty());
    }

    #[test]
    fn quotes_preserve_inner_whitespace() {
        let args = CommandLineTokenizer::new("sh -c 'echo hello world'").args();
        assert_eq!(args, vec!["sh", "-c", "echo hello world"]);

        let args = CommandLineTokenizer::new("sh -c \"sleep 5 && exit\"").args();
        assert_eq!(args, vec!["sh", "-c", "sleep 5 && exit"]);
    }

    #[test]
    fn backslash_escapes_whitespace() {
        let args = CommandLineTokenizer::new("cat /tmp/with\\ space").args();
        assert_eq!(args, vec!["cat", "/tmp/with space"]);
    }
}
