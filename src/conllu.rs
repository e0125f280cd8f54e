//! CoNLL-U input adapter
//!
//! String-level construction of the input contract from CoNLL-U text.
//! Handles comment metadata (`# sent_id`, `# text`), blank-line sentence
//! separation, and skips multi-word-token ranges (`1-2`) and empty nodes
//! (`3.1`), which have no place in the basic dependency tree. No file
//! I/O: callers hand in the text.

use crate::errors::{ChunkerError, Result};
use crate::types::{Sentence, Token, UPos};

/// Parse one CoNLL-U token line (10 tab-separated columns; the trailing
/// columns may be omitted).
pub fn parse_token(line: &str) -> Result<Token> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(ChunkerError::invalid_sentence(format!(
            "expected at least 8 CoNLL-U columns, got {}: '{}'",
            fields.len(),
            line
        )));
    }

    let id: usize = fields[0].parse().map_err(|_| {
        ChunkerError::invalid_sentence(format!("invalid token id '{}'", fields[0]))
    })?;
    let head: usize = fields[6].parse().map_err(|_| {
        ChunkerError::invalid_sentence(format!("invalid head '{}'", fields[6]))
    })?;

    Ok(Token::new(
        id,
        fields[1],
        fields[2],
        UPos::from_conllu(fields[3]),
        head,
        fields[7],
    ))
}

/// Check if a token line should be skipped: multi-word-token ranges
/// (`1-2`) and empty nodes (`3.1`) are not part of the basic tree.
fn is_skipped_id(id_field: &str) -> bool {
    id_field.contains('-') || id_field.contains('.')
}

/// Parse CoNLL-U text into sentences.
///
/// Sentences are separated by blank lines; `# sent_id` and `# text`
/// comments are picked up when present, otherwise sentences are numbered
/// sequentially from 1.
pub fn parse(text: &str) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut tokens: Vec<Token> = Vec::new();
    let mut sent_id: Option<String> = None;
    let mut sent_text: Option<String> = None;

    let flush = |tokens: &mut Vec<Token>,
                     sent_id: &mut Option<String>,
                     sent_text: &mut Option<String>,
                     sentences: &mut Vec<Sentence>|
     -> Result<()> {
        if tokens.is_empty() {
            return Ok(());
        }
        let id = sent_id
            .take()
            .unwrap_or_else(|| (sentences.len() + 1).to_string());
        let text = sent_text.take().unwrap_or_else(|| {
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });
        sentences.push(Sentence::new(id, text, std::mem::take(tokens))?);
        Ok(())
    };

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            flush(&mut tokens, &mut sent_id, &mut sent_text, &mut sentences)?;
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once('=') {
                match key.trim() {
                    "sent_id" => sent_id = Some(value.trim().to_string()),
                    "text" => sent_text = Some(value.trim().to_string()),
                    _ => {}
                }
            }
            continue;
        }
        if let Some(id_field) = trimmed.split('\t').next() {
            if is_skipped_id(id_field) {
                continue;
            }
        }
        tokens.push(parse_token(trimmed)?);
    }
    flush(&mut tokens, &mut sent_id, &mut sent_text, &mut sentences)?;

    Ok(sentences)
}
