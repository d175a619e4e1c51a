use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const GENERIC_SEARCH_URL: &str = "https://www.google.com/search?q=";

struct Portal {
    /// Lowercase fragments of the authority name, any of which selects the portal.
    names: &'static [&'static str],
    url_prefix: &'static str,
}

// South Dublin must be checked before Dublin City.
const PORTALS: [Portal; 4] = [
    Portal {
        names: &["dún laoghaire", "dun laoghaire", "rathdown", "dlr"],
        url_prefix: "https://planning.agileapplications.ie/dunlaoghaire/application-details/search?reference=",
    },
    Portal {
        names: &["south dublin"],
        url_prefix: "https://www.sdublincoco.ie/Planning/Details?regref=",
    },
    Portal {
        names: &["fingal"],
        url_prefix: "https://planning.agileapplications.ie/fingal/search-applications/results?reference=",
    },
    Portal {
        names: &["dublin city"],
        url_prefix: "https://webapps.dublincity.ie/PublicAccess_Live/SearchResult/RunThirdPartySearch?FileSystemId=PL&FOLDER1_REF=",
    },
];

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Link to the application on its authority's planning portal.
///
/// Unknown authorities get a web search for the application instead.
pub fn portal_url(authority: &str, application_number: &str) -> String {
    let authority_lower = authority.to_lowercase();

    let portal = PORTALS
        .iter()
        .find(|p| p.names.iter().any(|name| authority_lower.contains(*name)));

    match portal {
        Some(portal) => format!("{}{}", portal.url_prefix, encode(application_number)),
        None => format!(
            "{}{}",
            GENERIC_SEARCH_URL,
            encode(&format!(
                "{} planning application {}",
                authority, application_number
            ))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn decoded(url: &str) -> String {
        percent_decode_str(url).decode_utf8_lossy().into_owned()
    }

    #[test]
    fn it_should_link_to_fingal() {
        let url = portal_url("Fingal County Council", "FW21/1234");

        assert!(url.contains("fingal"));
        assert!(url.ends_with("FW21%2F1234"));
    }

    #[test]
    fn it_should_route_authorities_case_insensitively() {
        assert!(portal_url("DUBLIN CITY COUNCIL", "1234/24").starts_with("https://webapps.dublincity.ie/"));
        assert!(portal_url("South Dublin County Council", "SD24A/0001").contains("sdublincoco"));
        assert!(portal_url("Dún Laoghaire-Rathdown County Council", "D24A/0001").contains("dunlaoghaire"));
        assert!(portal_url("Dun Laoghaire Rathdown", "D24A/0001").contains("dunlaoghaire"));
    }

    #[test]
    fn it_should_fall_back_to_a_web_search() {
        let url = portal_url("Some Unknown Council", "X/1");

        assert!(url.starts_with(GENERIC_SEARCH_URL));
        assert!(!url.contains(' '));
        let query = decoded(&url);
        assert!(query.contains("Some Unknown Council"));
        assert!(query.contains("planning application"));
        assert!(query.contains("X/1"));
    }

    #[test]
    fn it_should_encode_like_a_uri_component() {
        assert_eq!(encode("a b/c-d_e.f(g)"), "a%20b%2Fc-d_e.f(g)");
    }
}
