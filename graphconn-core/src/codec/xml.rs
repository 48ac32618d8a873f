//! XML alias document codec.
//!
//! Reads and writes documents of the form:
//!
//! ```xml
//! <aliases>
//!   <alias>
//!     <name>prod</name>
//!     <uri>bolt://db1</uri>
//!     <user-name>neo4j</user-name>
//!     <password>secret</password>
//!     <allow-upgrade>false</allow-upgrade>
//!     <read-only>false</read-only>
//!   </alias>
//! </aliases>
//! ```

use std::fmt::Write;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{CodecError, CodecResult};
use crate::models::Alias;

use super::{AliasCodec, DecodedAliases, SkippedElement};

/// Root element of an alias document
pub const ALIASES_TAG: &str = "aliases";
/// Element holding a single alias
pub const ALIAS_TAG: &str = "alias";

const NAME_TAG: &str = "name";
const URI_TAG: &str = "uri";
const USER_NAME_TAG: &str = "user-name";
const PASSWORD_TAG: &str = "password";
const ALLOW_UPGRADE_TAG: &str = "allow-upgrade";
const READ_ONLY_TAG: &str = "read-only";

/// Field values collected for one alias element before validation
#[derive(Debug, Default)]
struct AliasDraft {
    name: Option<String>,
    uri: Option<String>,
    user_name: Option<String>,
    password: Option<String>,
    allow_upgrade: Option<String>,
    read_only: Option<String>,
}

impl AliasDraft {
    fn set_field(&mut self, field: &str, value: String) {
        match field {
            NAME_TAG => self.name = Some(value),
            URI_TAG => self.uri = Some(value),
            USER_NAME_TAG => self.user_name = Some(value),
            PASSWORD_TAG => self.password = Some(value),
            ALLOW_UPGRADE_TAG => self.allow_upgrade = Some(value),
            READ_ONLY_TAG => self.read_only = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> Result<Alias, String> {
        let name = self.name.ok_or_else(|| format!("missing <{NAME_TAG}>"))?;
        let uri = self.uri.ok_or_else(|| format!("missing <{URI_TAG}>"))?;

        // Field values are taken verbatim; an empty element is an empty value
        Ok(Alias {
            name,
            uri,
            user_name: self.user_name,
            password: self.password,
            allow_upgrade: parse_flag(ALLOW_UPGRADE_TAG, self.allow_upgrade.as_deref())?,
            read_only: parse_flag(READ_ONLY_TAG, self.read_only.as_deref())?,
        })
    }
}

fn parse_flag(field: &str, value: Option<&str>) -> Result<bool, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(format!("invalid boolean '{v}' in <{field}>")),
    }
}

/// Resolves the body of a `&...;` reference to the text it stands for
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let text = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    };
    Some(text.to_string())
}

/// Codec for the XML alias document format
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlAliasCodec;

impl XmlAliasCodec {
    /// Creates a new XML codec
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_alias(output: &mut String, alias: &Alias) {
        output.push_str("  <alias>\n");
        write_field(output, NAME_TAG, &alias.name);
        write_field(output, URI_TAG, &alias.uri);
        if let Some(ref user_name) = alias.user_name {
            write_field(output, USER_NAME_TAG, user_name);
        }
        if let Some(ref password) = alias.password {
            write_field(output, PASSWORD_TAG, password);
        }
        write_field(output, ALLOW_UPGRADE_TAG, bool_str(alias.allow_upgrade));
        write_field(output, READ_ONLY_TAG, bool_str(alias.read_only));
        output.push_str("  </alias>\n");
    }
}

const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn write_field(output: &mut String, tag: &str, value: &str) {
    let _ = writeln!(output, "    <{tag}>{}</{tag}>", escape(value));
}

impl AliasCodec for XmlAliasCodec {
    fn encode(&self, aliases: &[&Alias]) -> CodecResult<String> {
        let mut output = String::new();
        output.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        output.push('\n');

        if aliases.is_empty() {
            let _ = writeln!(output, "<{ALIASES_TAG}/>");
            return Ok(output);
        }

        let _ = writeln!(output, "<{ALIASES_TAG}>");
        for alias in aliases {
            Self::write_alias(&mut output, alias);
        }
        let _ = writeln!(output, "</{ALIASES_TAG}>");

        Ok(output)
    }

    #[allow(clippy::too_many_lines)]
    fn decode(&self, content: &str) -> CodecResult<DecodedAliases> {
        let mut result = DecodedAliases::default();

        // Remove BOM if present
        let content = content.trim_start_matches('\u{feff}');

        let mut reader = Reader::from_str(content);

        let mut depth = 0usize;
        let mut root_seen = false;
        let mut alias_index = 0usize;
        let mut draft: Option<AliasDraft> = None;
        let mut current_field: Option<String> = None;
        let mut field_text = String::new();
        let mut field_error: Option<String> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                CodecError::Malformed(format!(
                    "at position {}: {e}",
                    reader.error_position()
                ))
            })?;

            match event {
                Event::Start(e) | Event::Empty(e)
                    if depth == 0 && root_seen =>
                {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    return Err(CodecError::Malformed(format!(
                        "unexpected element <{name}> after the root element"
                    )));
                }
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match depth {
                        0 => {
                            if name != ALIASES_TAG {
                                return Err(CodecError::RootMismatch { found: name });
                            }
                            root_seen = true;
                        }
                        1 if name == ALIAS_TAG => {
                            draft = Some(AliasDraft::default());
                            field_error = None;
                        }
                        2 if draft.is_some() => {
                            current_field = Some(name);
                            field_text.clear();
                        }
                        _ => {}
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match depth {
                        0 => {
                            if name != ALIASES_TAG {
                                return Err(CodecError::RootMismatch { found: name });
                            }
                            root_seen = true;
                        }
                        1 if name == ALIAS_TAG => {
                            result.skipped.push(SkippedElement::new(
                                alias_index,
                                format!("missing <{NAME_TAG}>"),
                            ));
                            alias_index += 1;
                        }
                        2 => {
                            if let Some(ref mut d) = draft {
                                d.set_field(&name, String::new());
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    match depth {
                        1 => {
                            if let Some(d) = draft.take() {
                                let outcome = match field_error.take() {
                                    Some(reason) => Err(reason),
                                    None => d.finish(),
                                };
                                match outcome {
                                    Ok(alias) => result.aliases.push(alias),
                                    Err(reason) => result
                                        .skipped
                                        .push(SkippedElement::new(alias_index, reason)),
                                }
                                alias_index += 1;
                            }
                        }
                        2 => {
                            if let (Some(d), Some(field)) = (draft.as_mut(), current_field.take())
                            {
                                d.set_field(&field, std::mem::take(&mut field_text));
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(e) => {
                    if current_field.is_some() && depth == 3 {
                        match std::str::from_utf8(&e) {
                            Ok(text) => field_text.push_str(text),
                            Err(err) => field_error = Some(format!("invalid UTF-8: {err}")),
                        }
                    }
                }
                Event::CData(e) => {
                    if current_field.is_some() && depth == 3 {
                        match std::str::from_utf8(&e) {
                            Ok(text) => field_text.push_str(text),
                            Err(err) => field_error = Some(format!("invalid UTF-8: {err}")),
                        }
                    }
                }
                Event::GeneralRef(e) => {
                    if current_field.is_some() && depth == 3 {
                        let name = String::from_utf8_lossy(&e).to_string();
                        match resolve_reference(&name) {
                            Some(text) => field_text.push_str(&text),
                            None => {
                                field_error = Some(format!("unknown entity reference '&{name};'"));
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(CodecError::Malformed("document has no root element".to_string()));
        }
        if depth != 0 {
            return Err(CodecError::Malformed(
                "document ended inside an element".to_string(),
            ));
        }

        Ok(result)
    }
}
