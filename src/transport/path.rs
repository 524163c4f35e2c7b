//! Resource path templates and query-string assembly.
//!
//! Paths are assembled by plain concatenation (`api_url + version + resource`), so the
//! normalization step collapses every run of slashes and then restores the `//` of the
//! URL scheme by doubling the first slash.

pub const API_URL: &str = "https://r1-api.dotmailer.com";
pub const VERSION: &str = "/v2";

pub const ACCOUNT_INFO: &str = "/account-info";

pub const CAMPAIGNS: &str = "/campaigns";
pub const CAMPAIGNS_WITH_ACTIVITY_SINCE: &str = "/campaigns/with-activity-since/{}";
pub const CAMPAIGN: &str = "/campaigns/{}";
pub const CAMPAIGN_SUMMARY: &str = "/campaigns/{}/summary";
pub const CAMPAIGN_ACTIVITIES: &str = "/campaigns/{}/activities";
pub const CAMPAIGN_ACTIVITIES_SINCE: &str = "/campaigns/{}/activities/since-date/{}";

pub const ADDRESS_BOOKS: &str = "/address-books";
pub const ADDRESS_BOOK: &str = "/address-books/{}";
pub const ADDRESS_BOOK_CONTACTS: &str = "/address-books/{}/contacts";
pub const ADDRESS_BOOK_CONTACTS_DELETE: &str = "/address-books/{}/contacts/delete";
pub const ADDRESS_BOOK_CONTACTS_IMPORT: &str = "/address-books/{}/contacts/import";
pub const ADDRESS_BOOK_CONTACTS_UNSUBSCRIBED_SINCE: &str =
    "/address-books/{}/contacts/unsubscribed-since/{}";

pub const CONTACTS: &str = "/contacts";
pub const CONTACT: &str = "/contacts/{}";
pub const CONTACT_ADDRESS_BOOKS: &str = "/contacts/{}/address-books";
pub const CONTACTS_CREATED_SINCE: &str = "/contacts/created-since/{}";
pub const CONTACTS_UNSUBSCRIBED_SINCE: &str = "/contacts/unsubscribed-since/{}";
pub const CONTACTS_SUPPRESSED_SINCE: &str = "/contacts/suppressed-since/{}";
pub const CONTACTS_IMPORT: &str = "/contacts/import";
pub const CONTACTS_IMPORT_STATUS: &str = "/contacts/import/{}";
pub const CONTACTS_IMPORT_REPORT: &str = "/contacts/import/{}/report";

pub const DATA_FIELDS: &str = "/data-fields";
pub const DATA_FIELD: &str = "/data-fields/{}";

pub const EMAIL_TRIGGERED_CAMPAIGN: &str = "/email/triggered-campaign";
pub const EMAIL_STATS_SINCE_DATE: &str = "/email/stats/since-date/{}";

pub const PROGRAMS: &str = "/programs";
pub const PROGRAM: &str = "/programs/{}";
pub const PROGRAM_ENROLMENTS: &str = "/programs/enrolments";
pub const PROGRAM_ENROLMENT: &str = "/programs/enrolments/{}";

pub const WITH_FULL_DATA: &str = "withFullData";
pub const SELECT: &str = "select";
pub const SKIP: &str = "skip";

const PLACEHOLDER: &str = "{}";

/// Collapse every run of slashes to one, then double the first slash.
pub fn normalize(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len() + 1);
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' && previous_slash {
            continue;
        }
        previous_slash = ch == '/';
        collapsed.push(ch);
    }
    collapsed.replacen('/', "//", 1)
}

/// Normalize `path` and terminate it so a `name=value` pair can be appended.
pub fn with_query_prefix(path: &str) -> String {
    let mut path = normalize(path);
    if path.ends_with('/') {
        path.pop();
        path.push('?');
    } else if path.contains('?') {
        path.push('&');
    } else {
        path.push('?');
    }
    while path.contains("&&") {
        path = path.replace("&&", "&");
    }
    path
}

/// Append `name=value` to `path` as a query attribute.
pub fn add_attribute(path: &str, name: &str, value: &str) -> String {
    let mut path = with_query_prefix(path);
    path.push_str(name);
    path.push('=');
    path.push_str(value);
    path
}

/// Whether the query part of `path` already carries both `select` and `skip`.
pub fn has_paging_attributes(path: &str) -> bool {
    let Some((_, query)) = path.split_once('?') else {
        return false;
    };
    let mut select = false;
    let mut skip = false;
    for pair in query.split('&') {
        let name = pair.split_once('=').map_or(pair, |(name, _)| name);
        select |= name == SELECT;
        skip |= name == SKIP;
    }
    select && skip
}

/// Substitute `{}` placeholders in `template` positionally.
///
/// The template must contain exactly `args.len()` placeholders.
pub fn fill(template: &str, args: &[&str]) -> String {
    debug_assert_eq!(
        template.matches(PLACEHOLDER).count(),
        args.len(),
        "placeholder count mismatch for {template}"
    );
    let extra: usize = args.iter().map(|arg| arg.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    for arg in args {
        let Some(at) = rest.find(PLACEHOLDER) else {
            break;
        };
        out.push_str(&rest[..at]);
        out.push_str(arg);
        rest = &rest[at + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

pub fn with_id(template: &str, id: i64) -> String {
    fill(template, &[&id.to_string()])
}

pub fn with_param(template: &str, param: &str) -> String {
    fill(template, &[param])
}

pub fn with_id_and_param(template: &str, id: i64, param: &str) -> String {
    fill(template, &[&id.to_string(), param])
}
