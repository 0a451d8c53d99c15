//! Plain-data settings, loadable from JSON.
//!
//! Keys use the camelCase names of the options (`headingStyle`,
//! `listMarkerSpaceCount`, ...). Every key is optional; absent keys keep the
//! defaults and unknown keys are ignored.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::{
    BulletListMarker, CodeBlockStyle, EmDelimiter, HeadingStyle, HtmlRetentionMode,
    LinkReferenceDeduplication, LinkReferenceStyle, LinkStyle, ListItemIndent, Options,
    StrongDelimiter,
};

/// Scalar options as they appear in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_style: Option<HeadingStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_list_marker: Option<BulletListMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_marker_space_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item_indent: Option<ListItemIndent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item_indent_space_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block_style: Option<CodeBlockStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub em_delimiter: Option<EmDelimiter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_delimiter: Option<StrongDelimiter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_style: Option<LinkStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_reference_style: Option<LinkReferenceStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_reference_deduplication: Option<LinkReferenceDeduplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub br: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preformatted_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_retention_mode: Option<HtmlRetentionMode>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overlay the present settings onto `options`.
    pub fn apply(&self, mut options: Options) -> Options {
        macro_rules! overlay {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        options.$field = value.clone();
                    }
                )+
            };
        }
        overlay!(
            heading_style,
            hr,
            bullet_list_marker,
            list_marker_space_count,
            list_item_indent,
            list_item_indent_space_count,
            code_block_style,
            fence,
            em_delimiter,
            strong_delimiter,
            link_style,
            link_reference_style,
            link_reference_deduplication,
            br,
            preformatted_code,
            html_retention_mode,
        );
        options
    }

    pub fn into_options(self) -> Options {
        self.apply(Options::default())
    }
}
