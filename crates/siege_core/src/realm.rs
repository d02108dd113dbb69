//! Realm identity and hostility rules.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Realm {
    #[default]
    None,
    Albion,
    Midgard,
    Hibernia,
}

impl Realm {
    pub fn name(self) -> &'static str {
        match self {
            Realm::None => "None",
            Realm::Albion => "Albion",
            Realm::Midgard => "Midgard",
            Realm::Hibernia => "Hibernia",
        }
    }

    /// Parse a data-file realm name; unknown strings mean no realm.
    pub fn parse(s: &str) -> Realm {
        match s.to_ascii_lowercase().as_str() {
            "albion" => Realm::Albion,
            "midgard" => Realm::Midgard,
            "hibernia" => Realm::Hibernia,
            "none" | "" => Realm::None,
            other => {
                log::warn!("unknown realm name '{other}', treating as none");
                Realm::None
            }
        }
    }
}

/// The three realms are mutually hostile; an unowned structure threatens
/// no one.
#[inline]
pub fn are_hostile(a: Realm, b: Realm) -> bool {
    a != Realm::None && b != Realm::None && a != b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostility_excludes_unowned() {
        assert!(are_hostile(Realm::Albion, Realm::Midgard));
        assert!(!are_hostile(Realm::Albion, Realm::Albion));
        assert!(!are_hostile(Realm::None, Realm::Hibernia));
    }
}
