//! Install image selection fragment.

/// Builds the `InstallFrom` block that picks an image out of `install.wim`.
pub struct ImageSelectorBuilder;

impl ImageSelectorBuilder {
    /// Format the image index selector.
    ///
    /// `None` only happens when parameter validation was skipped; the
    /// skeleton is still produced, with an empty value.
    pub fn build_image_index_fragment(index: Option<u32>) -> String {
        let value = index.map(|i| i.to_string()).unwrap_or_default();
        format!(
            r#"<InstallFrom>
            <MetaData wcm:action="add">
                <Key>/IMAGE/INDEX</Key>
                <Value>{value}</Value>
            </MetaData>
        </InstallFrom>"#
        )
    }
}
