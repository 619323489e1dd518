/// The identity the agent speaks as.
///
/// Both fields are interpolated verbatim into prompts; the profile is
/// typically a resume or bio in markdown and its structure is never
/// inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persona {
    display_name: String,
    profile_text: String,
}

impl Persona {
    /// Creates a persona from a display name and a profile document.
    #[inline]
    pub fn new<N: Into<String>, P: Into<String>>(
        display_name: N,
        profile_text: P,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            profile_text: profile_text.into(),
        }
    }

    /// Returns the name the agent introduces itself with.
    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the background document answers must be grounded in.
    #[inline]
    pub fn profile_text(&self) -> &str {
        &self.profile_text
    }
}
