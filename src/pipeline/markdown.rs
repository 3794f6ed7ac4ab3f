//! Markdown assembly: title block, per-page text sections, image sections.
//!
//! A document is built as an ordered list of opaque fragments which are
//! joined with `\n` once every page has been visited. The fragment
//! boundaries are part of the output format: each fragment carries its own
//! leading/trailing newlines, so the join produces the blank lines between
//! sections.
//!
//! ```text
//! # Nfse Nacional Manual
//!
//! *Converted from: nfse-nacional-manual.pdf*
//!
//! ---
//!
//!
//! ## Page 1
//!
//! first line
//! second line
//!
//!
//! ### Images from Page 1
//!
//! ![Image](images/nfse-nacional-manual/page1_img1.png)
//! ```

/// Fragment separator used when joining the document.
const FRAGMENT_SEPARATOR: &str = "\n";

/// Separator between consecutive image references of one page.
const IMAGE_REF_SEPARATOR: &str = "\n\n";

/// Accumulates the fragments of one output document.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    fragments: Vec<String>,
}

impl MarkdownDocument {
    /// Start a document with its title, provenance line and separator.
    ///
    /// # Arguments
    /// * `stem`        - document identifier (input filename without extension)
    /// * `source_name` - input filename, shown in the provenance line
    pub fn new(stem: &str, source_name: &str) -> Self {
        Self {
            fragments: vec![
                format!("# {}\n", document_title(stem)),
                format!("*Converted from: {}*\n", source_name),
                "---\n".to_string(),
            ],
        }
    }

    /// Append a `## Page <n>` section if the page has any non-blank text.
    ///
    /// Returns `true` when a section was emitted.
    pub fn push_page_text(&mut self, page_num: usize, raw_text: &str) -> bool {
        match normalize_page_text(raw_text) {
            Some(text) => {
                self.fragments.push(format!("\n## Page {}\n", page_num));
                self.fragments.push(text);
                self.fragments.push("\n".to_string());
                true
            }
            None => false,
        }
    }

    /// Append an `### Images from Page <n>` section for the given references.
    ///
    /// Does nothing when `image_refs` is empty.
    pub fn push_page_images(&mut self, page_num: usize, image_refs: &[String]) {
        if image_refs.is_empty() {
            return;
        }
        self.fragments
            .push(format!("\n### Images from Page {}\n", page_num));
        self.fragments.push(image_refs.join(IMAGE_REF_SEPARATOR));
        self.fragments.push("\n".to_string());
    }

    /// Number of fragments accumulated so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Join all fragments into the final file content.
    pub fn finish(self) -> String {
        self.fragments.join(FRAGMENT_SEPARATOR)
    }
}

/// Markdown image reference for an extracted image file.
///
/// Paths are relative to the output directory, where the `.md` file lives.
pub fn image_reference(stem: &str, file_name: &str) -> String {
    format!(
        "![Image]({}/{}/{})",
        crate::config::IMAGES_DIR_NAME,
        stem,
        file_name
    )
}

/// Human-readable title derived from a filename stem.
///
/// Hyphens become spaces and every word is title-cased:
/// `nfse-nacional-manual` → `Nfse Nacional Manual`.
pub fn document_title(stem: &str) -> String {
    title_case(&stem.replace('-', " "))
}

/// Title-case a string.
///
/// The first cased character of every run of cased characters is
/// title-cased and the rest are lower-cased. Any uncased character (space,
/// digit, punctuation) ends a run, so `2nd-edition` becomes `2Nd Edition`.
fn title_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_word {
            if c == 'Σ' && is_final_sigma(&chars[i + 1..]) {
                out.push('ς');
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            push_titlecase(c, &mut out);
        }
        in_word = is_cased(c);
    }

    out
}

/// Letters with a distinct titlecase form (Unicode category Lt).
fn is_titlecase_letter(c: char) -> bool {
    matches!(
        c,
        '\u{1C5}' | '\u{1C8}' | '\u{1CB}' | '\u{1F2}'
            | '\u{1F88}'..='\u{1F8F}'
            | '\u{1F98}'..='\u{1F9F}'
            | '\u{1FA8}'..='\u{1FAF}'
            | '\u{1FBC}' | '\u{1FCC}' | '\u{1FFC}'
    )
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase() || is_titlecase_letter(c)
}

/// A capital sigma ends a word unless a cased letter follows, looking past
/// apostrophes and in-word punctuation.
fn is_final_sigma(rest: &[char]) -> bool {
    let next = rest
        .iter()
        .find(|&&c| !matches!(c, '\'' | '.' | ':' | '·' | '\u{2018}' | '\u{2019}'));
    !next.is_some_and(|&c| is_cased(c))
}

/// Append the titlecase mapping of `c`.
fn push_titlecase(c: char, out: &mut String) {
    match c {
        // Latin digraphs: Ǆ ǅ ǆ → ǅ, and so on.
        '\u{1C4}'..='\u{1C6}' => out.push('\u{1C5}'),
        '\u{1C7}'..='\u{1C9}' => out.push('\u{1C8}'),
        '\u{1CA}'..='\u{1CC}' => out.push('\u{1CB}'),
        '\u{1F1}'..='\u{1F3}' => out.push('\u{1F2}'),
        // Georgian Mkhedruli titlecases to itself.
        '\u{10D0}'..='\u{10FA}' | '\u{10FD}'..='\u{10FF}' => out.push(c),
        // Greek with ypogegrammeni keeps the iota as prosgegrammeni.
        '\u{1F80}'..='\u{1FAF}' => out.push(char::from_u32(c as u32 | 0x8).unwrap_or(c)),
        '\u{1FB3}' | '\u{1FBC}' => out.push('\u{1FBC}'),
        '\u{1FC3}' | '\u{1FCC}' => out.push('\u{1FCC}'),
        '\u{1FF3}' | '\u{1FFC}' => out.push('\u{1FFC}'),
        '\u{1FB2}' | '\u{1FB4}' | '\u{1FB7}' | '\u{1FC2}' | '\u{1FC4}' | '\u{1FC7}'
        | '\u{1FF2}' | '\u{1FF4}' | '\u{1FF7}' => {
            let mut upper: Vec<char> = c.to_uppercase().collect();
            if upper.last() == Some(&'\u{399}') {
                upper.pop();
                upper.push('\u{345}');
            }
            out.extend(upper);
        }
        _ => {
            // Multi-character expansions (ß → SS, ﬀ → FF, ŉ → ʼN) keep only
            // their first cased character upper-case.
            let mut seen_cased = false;
            for u in c.to_uppercase() {
                if seen_cased {
                    out.extend(u.to_lowercase());
                } else {
                    seen_cased = is_cased(u);
                    out.push(u);
                }
            }
        }
    }
}

/// Whitespace as understood by `str.isspace`-style trimming: Unicode
/// White_Space plus the ASCII information separators U+001C..U+001F.
fn is_text_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// Normalise extracted page text.
///
/// Every line is trimmed, blank lines are dropped and the survivors are
/// rejoined with single newlines. Returns `None` for empty or
/// whitespace-only text.
pub fn normalize_page_text(text: &str) -> Option<String> {
    if text.trim_matches(is_text_space).is_empty() {
        return None;
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_matches(is_text_space))
        .filter(|line| !line.is_empty())
        .collect();

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_hyphenated_stem() {
        assert_eq!(document_title("nfse-nacional-manual"), "Nfse Nacional Manual");
    }

    #[test]
    fn title_lowercases_inner_capitals() {
        assert_eq!(document_title("API-REFERENCE"), "Api Reference");
        assert_eq!(document_title("manual_v2"), "Manual_V2");
    }

    #[test]
    fn title_restarts_after_digits_and_apostrophes() {
        assert_eq!(document_title("2nd-edition"), "2Nd Edition");
        assert_eq!(document_title("user's-guide"), "User'S Guide");
    }

    #[test]
    fn title_handles_accented_letters() {
        assert_eq!(document_title("emissão-de-nota"), "Emissão De Nota");
        assert_eq!(document_title("ÉMISSION"), "Émission");
    }

    #[test]
    fn title_uses_titlecase_not_uppercase() {
        assert_eq!(document_title("ßtraße"), "Sstraße");
        assert_eq!(document_title("ﬁle-ŉx"), "File ʼNx");
        assert_eq!(document_title("ǆemal-ǉubljana"), "ǅemal ǈubljana");
        assert_eq!(document_title("ᾳδη"), "ᾼδη");
        assert_eq!(document_title("ᾷ"), "\u{391}\u{342}\u{345}");
    }

    #[test]
    fn titlecase_letters_start_a_word() {
        assert_eq!(document_title("ǅX"), "ǅx");
        assert_eq!(document_title("ⓐⓑ-ⓒ"), "Ⓐⓑ Ⓒ");
    }

    #[test]
    fn title_lowercases_final_sigma() {
        assert_eq!(document_title("ΟΔΟΣ-ΣΑ"), "Οδος Σα");
        assert_eq!(document_title("ΑΣ.Σ"), "Ασ.Σ");
    }

    #[test]
    fn normalize_strips_information_separators() {
        let raw = "\u{1c} Header \u{1f}\n\u{1e}\u{1d}\n\u{3000}body\u{a0}";
        assert_eq!(normalize_page_text(raw).as_deref(), Some("Header\nbody"));
        assert_eq!(normalize_page_text("\u{1c}\u{1d}\u{1e}\u{1f}"), None);
    }

    #[test]
    fn normalize_trims_lines_and_drops_blanks() {
        let raw = "  Header  \r\n\r\n   \n\tBody line\t\nlast";
        assert_eq!(
            normalize_page_text(raw).as_deref(),
            Some("Header\nBody line\nlast")
        );
    }

    #[test]
    fn normalize_rejects_whitespace_only() {
        assert_eq!(normalize_page_text(""), None);
        assert_eq!(normalize_page_text(" \n\t\r\n "), None);
    }

    #[test]
    fn image_reference_is_relative_to_output_dir() {
        assert_eq!(
            image_reference("manual", "page3_img2.jpeg"),
            "![Image](images/manual/page3_img2.jpeg)"
        );
    }

    #[test]
    fn header_only_document() {
        let doc = MarkdownDocument::new("nfse-nacional-manual", "nfse-nacional-manual.pdf");
        assert_eq!(
            doc.finish(),
            "# Nfse Nacional Manual\n\n*Converted from: nfse-nacional-manual.pdf*\n\n---\n"
        );
    }

    #[test]
    fn whitespace_page_adds_no_fragments() {
        let mut doc = MarkdownDocument::new("a", "a.pdf");
        assert!(!doc.push_page_text(1, "   \n  "));
        doc.push_page_images(1, &[]);
        assert_eq!(doc.fragment_count(), 3);
    }

    #[test]
    fn page_text_and_images_exact_layout() {
        let mut doc = MarkdownDocument::new("guide", "guide.pdf");
        assert!(doc.push_page_text(1, " Intro \n\n body "));
        doc.push_page_images(
            1,
            &[
                image_reference("guide", "page1_img1.png"),
                image_reference("guide", "page1_img2.jpeg"),
            ],
        );
        doc.push_page_images(2, &[image_reference("guide", "page2_img1.png")]);

        let expected = "# Guide\n\
\n\
*Converted from: guide.pdf*\n\
\n\
---\n\
\n\
\n\
## Page 1\n\
\n\
Intro\n\
body\n\
\n\
\n\
\n\
### Images from Page 1\n\
\n\
![Image](images/guide/page1_img1.png)\n\
\n\
![Image](images/guide/page1_img2.jpeg)\n\
\n\
\n\
\n\
### Images from Page 2\n\
\n\
![Image](images/guide/page2_img1.png)\n\
\n";
        assert_eq!(doc.finish(), expected);
    }
}
