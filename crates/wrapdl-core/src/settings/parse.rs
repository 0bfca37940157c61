//! Streaming walk over settings.xml looking for one `<server>` entry.
//!
//! Only `/settings/servers/server` is inspected (first `servers` container).
//! Element names are compared by local name, so a default `xmlns` or a
//! prefix on the Maven settings namespace does not matter. Text is taken
//! verbatim (no trimming), and the server id comparison is exact. A server
//! with several `<id>` children matches on any of them; for `username` and
//! `password` the first occurrence wins.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::BufRead;

use super::error::SettingsLookupError;

/// Fields of one `<server>` element.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ServerEntry {
    pub(crate) ids: Vec<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Username,
    Password,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Field::Id),
            "username" => Some(Field::Username),
            "password" => Some(Field::Password),
            _ => None,
        }
    }
}

/// Walk state: element path from the root plus the server being collected.
#[derive(Default)]
struct Walk {
    path: Vec<String>,
    servers_done: bool,
    server: Option<ServerEntry>,
    field: Option<(Field, String)>,
    found: Option<ServerEntry>,
}

impl Walk {
    fn in_servers(&self) -> bool {
        !self.servers_done
            && self.path.len() >= 2
            && self.path[0] == "settings"
            && self.path[1] == "servers"
    }

    fn open(&mut self, name: String) {
        self.path.push(name);
        if !self.in_servers() {
            return;
        }
        match self.path.len() {
            3 if self.path[2] == "server" => self.server = Some(ServerEntry::default()),
            4 if self.server.is_some() => {
                self.field = Field::from_name(&self.path[3]).map(|f| (f, String::new()));
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, buf)) = self.field.as_mut() {
            buf.push_str(text);
        }
    }

    fn close(&mut self, server_id: &str) {
        if self.in_servers() {
            match self.path.len() {
                2 => self.servers_done = true,
                3 => {
                    if let Some(server) = self.server.take() {
                        if self.found.is_none() && server.ids.iter().any(|id| id == server_id) {
                            self.found = Some(server);
                        }
                    }
                }
                4 => {
                    if let (Some((field, value)), Some(server)) =
                        (self.field.take(), self.server.as_mut())
                    {
                        match field {
                            Field::Id => server.ids.push(value),
                            Field::Username => first_wins(&mut server.username, value),
                            Field::Password => first_wins(&mut server.password, value),
                        }
                    }
                }
                _ => {}
            }
        }
        self.path.pop();
    }
}

fn first_wins(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn element_name(local: &[u8]) -> String {
    String::from_utf8_lossy(local).into_owned()
}

/// Parses the whole document and returns the first `server` whose `id` equals `server_id`.
/// A malformed document anywhere is an error, even after a match.
pub(crate) fn find_server<R: BufRead>(
    source: R,
    server_id: &str,
) -> Result<Option<ServerEntry>, SettingsLookupError> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut walk = Walk::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => walk.open(element_name(e.local_name().as_ref())),
            Event::Empty(e) => {
                walk.open(element_name(e.local_name().as_ref()));
                walk.close(server_id);
            }
            Event::End(_) => walk.close(server_id),
            Event::Text(t) => {
                let text = t.unescape()?;
                walk.text(&text);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                walk.text(&String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = walk.path.last() {
        return Err(SettingsLookupError::Truncated(open.clone()));
    }
    Ok(walk.found)
}
