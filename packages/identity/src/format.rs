//! Display-name formatting for team slugs and contract types.

/// Words kept lowercase unless they open or close the phrase.
const MINOR_WORDS: &[&str] = &[
    "and", "or", "the", "in", "at", "for", "to", "by", "with", "a", "an", "of", "on", "vs",
];

/// Prefixes hyphen-joined to the following word (`Non-Taxpayer`).
const JOINING_PREFIXES: &[&str] = &["non", "mid", "bi"];

/// Formats a team slug such as `la-clippers` as `LA Clippers`.
///
/// `la` becomes `LA`, alphabetic tokens are capitalized and anything else
/// (e.g. `76ers`) is kept as-is.
#[must_use]
pub fn format_team(slug: &str) -> String {
    slug.split('-')
        .map(|token| {
            let lower = token.to_lowercase();
            if lower == "la" {
                "LA".to_owned()
            } else if is_alphabetic(&lower) {
                capitalize(&lower)
            } else {
                token.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-cases a phrase using the contract-type conventions.
///
/// Splits on hyphens and whitespace, keeps minor words lowercase except at
/// the ends, hyphen-joins `non`/`mid`/`bi` with the next word, upper-cases
/// `la`, and spells `Sign-and-Trade` with hyphens.
#[must_use]
pub fn title_case(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| c == '-' || c.is_whitespace())
        .map(str::to_lowercase)
        .collect();
    let last = words.len().saturating_sub(1);

    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = words[i].as_str();
        if word == "la" {
            out.push("LA".to_owned());
        } else if JOINING_PREFIXES.contains(&word) && i < last {
            out.push(format!("{}-{}", capitalize(word), capitalize(&words[i + 1])));
            i += 1;
        } else if MINOR_WORDS.contains(&word) && i != 0 && i != last {
            out.push(word.to_owned());
        } else if is_alphabetic(word) {
            out.push(capitalize(word));
        } else {
            out.push(word.to_owned());
        }
        i += 1;
    }

    out.join(" ").replace("Sign and Trade", "Sign-and-Trade")
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_la_team() {
        assert_eq!(format_team("la-clippers"), "LA Clippers");
        assert_eq!(format_team("los-angeles-lakers"), "Los Angeles Lakers");
    }

    #[test]
    fn keeps_numeric_team_tokens() {
        assert_eq!(format_team("philadelphia-76ers"), "Philadelphia 76ers");
    }

    #[test]
    fn joins_prefixes_with_next_word() {
        assert_eq!(
            title_case("non-taxpayer mid-level exception"),
            "Non-Taxpayer Mid-Level Exception"
        );
        assert_eq!(title_case("bi-annual exception"), "Bi-Annual Exception");
    }

    #[test]
    fn trailing_prefix_is_capitalized_alone() {
        assert_eq!(title_case("exception non"), "Exception Non");
    }

    #[test]
    fn minor_words_stay_lowercase_inside() {
        assert_eq!(title_case("SIGN AND TRADE"), "Sign-and-Trade");
        assert_eq!(title_case("room of the year"), "Room of the Year");
        assert_eq!(title_case("the end"), "The End");
        assert_eq!(title_case("left on"), "Left On");
    }

    #[test]
    fn non_alphabetic_tokens_pass_through() {
        assert_eq!(title_case("2025 / rfa"), "2025 / Rfa");
        assert_eq!(title_case("1st round pick"), "1st Round Pick");
    }

    #[test]
    fn uppercases_la() {
        assert_eq!(title_case("la clippers"), "LA Clippers");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(title_case(""), "");
        assert_eq!(format_team(""), "");
    }
}
