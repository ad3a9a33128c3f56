use crate::scrapers::types::AVITO_DOMAIN;

/// Build the marketplace search URL for a (phrase, region) pair.
///
/// Pure: blank inputs are accepted and produce a bare `/` path or an
/// empty `q` value. Rejecting them is the API layer's job.
pub fn build_search_url(search_phrase: &str, region: &str) -> String {
    build_search_url_for(AVITO_DOMAIN, search_phrase, region)
}

/// Same as [`build_search_url`] against an explicit domain
pub fn build_search_url_for(domain: &str, search_phrase: &str, region: &str) -> String {
    let domain = domain.trim_end_matches('/');
    format!(
        "{}/{}?q={}",
        domain,
        transliterate_region(region),
        encode_phrase(search_phrase)
    )
}

/// Whitespace becomes a literal `+`, which is then percent-encoded with
/// everything else.
pub fn encode_phrase(search_phrase: &str) -> String {
    let plussed: String = search_phrase
        .chars()
        .map(|c| if c.is_whitespace() { '+' } else { c })
        .collect();
    urlencoding::encode(&plussed).into_owned()
}

/// Turn a region name into a lower-case Latin path segment.
///
/// Cyrillic goes through a fixed table and accented Latin letters are
/// folded to their base letter. ASCII letters and digits pass through
/// lower-cased and words are joined with `_`. Anything else that would
/// need escaping in a path is dropped.
pub fn transliterate_region(region: &str) -> String {
    region
        .split_whitespace()
        .map(transliterate_word)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn transliterate_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars().flat_map(char::to_lowercase) {
        if let Some(latin) = cyrillic_to_latin(c).or_else(|| fold_latin(c)) {
            out.push_str(latin);
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        }
    }
    out
}

fn cyrillic_to_latin(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ы' => "y",
        'ю' => "ju",
        'я' => "ja",
        // hard and soft signs have no Latin counterpart
        'ъ' | 'ь' => "",
        _ => return None,
    };
    Some(latin)
}

/// Lower-case Latin letters with diacritics, mapped to plain ASCII
fn fold_latin(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' | 'ĺ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(ascii)
}
