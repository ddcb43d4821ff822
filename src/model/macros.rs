/// `Display` for a fieldless enum. The names given here match the enum's
/// `#[serde(rename_all = "snake_case")]` form.
macro_rules! display_names {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text,)+
                })
            }
        }
    };
}
