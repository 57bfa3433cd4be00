/// The fill/stroke literals that mark a path for shrinking.
pub const BLACK_LITERALS: [&str; 5] = ["#000", "#000000", "black", "rgb(0,0,0)", "rgba(0,0,0,1)"];

/// The presentation attributes of one path, in document order.
///
/// Declarations from a `style="..."` attribute are merged in after the
/// presentation attributes and replace them, as CSS does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStyle {
    attributes: Vec<(String, String)>,
}

impl PathStyle {
    /// An empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a style from `(name, value)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use trimline_vector::style::PathStyle;
    ///
    /// let style = PathStyle::from_pairs([("fill", "black"), ("stroke", "none")]);
    /// assert_eq!(style.fill(), Some("black"));
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut style = Self::new();
        for (name, value) in pairs {
            style.set(name, value);
        }
        style
    }

    /// Value of the attribute `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set `name` to `value`, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Merge the declarations of a CSS `style` attribute, e.g. `fill:#000;stroke:none`.
    pub fn merge_declarations(&mut self, declarations: &str) {
        for declaration in declarations.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    self.set(name, value.trim());
                }
            }
        }
    }

    /// The `fill` attribute.
    pub fn fill(&self) -> Option<&str> {
        self.get("fill")
    }

    /// The `stroke` attribute.
    pub fn stroke(&self) -> Option<&str> {
        self.get("stroke")
    }

    /// Iterate over the attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn normalize(color: &str) -> String {
    color.trim().to_ascii_lowercase()
}

/// Decides which paths of a document are shrunk.
///
/// A path qualifies when its fill or its stroke equals one of the target
/// colors, compared case-insensitively after trimming whitespace. The default
/// target is the set of black literals in [`BLACK_LITERALS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkTarget {
    colors: Vec<String>,
}

impl Default for ShrinkTarget {
    fn default() -> Self {
        Self::new(BLACK_LITERALS)
    }
}

impl ShrinkTarget {
    /// A target matching any of `colors`.
    pub fn new<S: AsRef<str>>(colors: impl IntoIterator<Item = S>) -> Self {
        Self {
            colors: colors.into_iter().map(|c| normalize(c.as_ref())).collect(),
        }
    }

    /// Whether a single color value matches the target.
    pub fn matches_color(&self, value: &str) -> bool {
        let value = normalize(value);
        self.colors.iter().any(|c| *c == value)
    }

    /// Whether the path with this style should be shrunk.
    ///
    /// # Example
    ///
    /// ```
    /// use trimline_vector::style::{PathStyle, ShrinkTarget};
    ///
    /// let target = ShrinkTarget::default();
    /// assert!(target.is_shrink_target(&PathStyle::from_pairs([("fill", " BLACK ")])));
    /// assert!(!target.is_shrink_target(&PathStyle::from_pairs([("fill", "#010101")])));
    /// ```
    pub fn is_shrink_target(&self, style: &PathStyle) -> bool {
        [style.fill(), style.stroke()]
            .into_iter()
            .flatten()
            .any(|value| self.matches_color(value))
    }
}
