//! Endpoint table: HTTP method and path for every API operation.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;

// Characters that cannot appear raw inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn seg(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route<'a> {
    SendIndividual { account: &'a str },
    SendGroup { account: &'a str },
    MessageDetails { account: &'a str, message_id: &'a str },
    RecentMessages { account: &'a str, thread_id: &'a str },
    ThreadDetails { account: &'a str, thread_id: &'a str },
    AllThreads { account: &'a str },
    ThreadsByPhone { account: &'a str, phone: &'a str },
    SendEmail { account: &'a str },
    CreateEmail { account: &'a str },
    WhatsAppIncoming,
}

impl Route<'_> {
    pub(crate) fn method(&self) -> Method {
        match self {
            Route::MessageDetails { .. }
            | Route::RecentMessages { .. }
            | Route::ThreadDetails { .. }
            | Route::AllThreads { .. }
            | Route::ThreadsByPhone { .. } => Method::GET,
            Route::SendIndividual { .. }
            | Route::SendGroup { .. }
            | Route::SendEmail { .. }
            | Route::CreateEmail { .. }
            | Route::WhatsAppIncoming => Method::POST,
        }
    }

    pub(crate) fn path(&self) -> String {
        match *self {
            Route::SendIndividual { account } => {
                format!("/messages/individual/{}/send", seg(account))
            }
            Route::SendGroup { account } => format!("/messages/group/{}/send", seg(account)),
            Route::MessageDetails { account, message_id } => format!(
                "/messages/individual/{}/get-details/{}",
                seg(account),
                seg(message_id)
            ),
            Route::RecentMessages { account, thread_id } => format!(
                "/messages/threads/{}/get-recent/{}",
                seg(account),
                seg(thread_id)
            ),
            Route::ThreadDetails { account, thread_id } => format!(
                "/messages/threads/{}/get-details/{}",
                seg(account),
                seg(thread_id)
            ),
            Route::AllThreads { account } => format!("/messages/threads/{}/get-all", seg(account)),
            Route::ThreadsByPhone { account, phone } => {
                format!("/messages/threads/{}/get-all/{}", seg(account), seg(phone))
            }
            Route::SendEmail { account } => format!("/emails/{}/send", seg(account)),
            Route::CreateEmail { account } => format!("/emails/{}/create-email", seg(account)),
            Route::WhatsAppIncoming => "/wa/whatsapp/incoming".to_string(),
        }
    }
}
