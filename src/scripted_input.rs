use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::warn;

use crate::simulation::{Intent, IntentSource};

/// Replays a fixed list of intents; once exhausted it asks to quit.
pub struct ScriptedInput {
    script_commands: Vec<Intent>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }
        Ok(Self::from_lines(lines.iter().map(String::as_str)))
    }

    pub fn from_script(script: &str) -> Self {
        Self::from_lines(script.lines())
    }

    fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut script_commands = Vec::new();
        for line in lines {
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for char_code in trimmed_line.chars() {
                if char_code.is_whitespace() {
                    continue;
                }
                match char_to_intent(char_code) {
                    Some(intent) => script_commands.push(intent),
                    None => warn!(key = %char_code, "unknown key in script"),
                }
            }
        }

        Self {
            script_commands,
            current_command_index: 0,
        }
    }

    pub fn next_intent(&mut self) -> Option<Intent> {
        let intent = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(intent)
    }

    pub fn remaining(&self) -> usize {
        self.script_commands.len() - self.current_command_index
    }
}

impl IntentSource for ScriptedInput {
    fn poll_intent(&mut self) -> Intent {
        self.next_intent().unwrap_or(Intent::Quit)
    }
}

fn char_to_intent(c: char) -> Option<Intent> {
    match c {
        'w' | 'W' | 'k' | 'K' => Some(Intent::Up),
        's' | 'S' | 'j' | 'J' => Some(Intent::Down),
        'a' | 'A' | 'h' | 'H' => Some(Intent::Left),
        'd' | 'D' | 'l' | 'L' => Some(Intent::Right),
        '.' => Some(Intent::Wait),
        'q' | 'Q' | '\x1B' => Some(Intent::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_skips_comments() {
        let mut input = ScriptedInput::from_script("# opening\nwasd\n\n.hjkl q\n?");
        assert_eq!(input.remaining(), 10);
        let first: Vec<Intent> = (0..5).map(|_| input.poll_intent()).collect();
        assert_eq!(
            first,
            vec![
                Intent::Up,
                Intent::Left,
                Intent::Down,
                Intent::Right,
                Intent::Wait
            ]
        );
    }

    #[test]
    fn exhausted_script_quits() {
        let mut input = ScriptedInput::from_script("d");
        assert_eq!(input.poll_intent(), Intent::Right);
        assert_eq!(input.poll_intent(), Intent::Quit);
        assert_eq!(input.poll_intent(), Intent::Quit);
    }
}
