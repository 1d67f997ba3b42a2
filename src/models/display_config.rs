use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr};

/// Declares a lowercase option enum that round-trips through query strings.
macro_rules! option_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident) => {
        #[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

option_enum!(Theme { Light => "light", Dark => "dark" } default Light);
option_enum!(SortDirection { Asc => "asc", Desc => "desc" } default Desc);
option_enum!(Layout { Grid => "grid", Row => "row", Column => "column" } default Grid);
option_enum!(AnimationStyle { Fade => "fade", Scale => "scale", Slide => "slide" } default Fade);
option_enum!(ThemePreset { Default => "default", Dark => "dark", Modern => "modern", Classic => "classic" } default Default);

impl ThemePreset {
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn accent_color(&self) -> HexColor {
        let hex = match self {
            ThemePreset::Default => "#4F46E5",
            ThemePreset::Dark => "#10B981",
            ThemePreset::Modern => "#6366F1",
            ThemePreset::Classic => "#D97706",
        };
        HexColor(hex.to_string())
    }
}

/// CSS colour in `#rgb` or `#rrggbb` form.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        ThemePreset::Default.accent_color()
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| format!("colour '{}' must start with '#'", s))?;
        let valid_length = digits.len() == 3 || digits.len() == 6;
        if !valid_length || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("'{}' is not a hex colour", s));
        }
        Ok(HexColor(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const MAX_FILTER_RATING: u8 = 5;

/// Options controlling which reviews are shown and how the widget looks.
///
/// Every field has a default, so any subset of options deserializes into a
/// complete configuration.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub theme: Theme,
    pub accent_color: HexColor,
    pub filter_rating: u8,
    pub sort_by_date: bool,
    pub sort_direction: SortDirection,
    pub show_photos: bool,
    pub compact_view: bool,
    pub max_reviews: i64,
    pub layout: Layout,
    pub spacing: u32,
    pub card_width: u32,
    pub show_verified_badge: bool,
    pub animation_style: AnimationStyle,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: HexColor::default(),
            filter_rating: 0,
            sort_by_date: true,
            sort_direction: SortDirection::default(),
            show_photos: true,
            compact_view: false,
            max_reviews: 5,
            layout: Layout::default(),
            spacing: 6,
            card_width: 400,
            show_verified_badge: true,
            animation_style: AnimationStyle::default(),
        }
    }
}

impl DisplayConfig {
    /// Resets values outside their domain back to the defaults.
    pub fn sanitized(mut self) -> Self {
        if self.filter_rating > MAX_FILTER_RATING {
            self.filter_rating = 0;
        }
        self
    }

    /// Query parameters in the same camelCase names the embed page reads.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("theme", self.theme.to_string()),
            ("accentColor", self.accent_color.to_string()),
            ("filterRating", self.filter_rating.to_string()),
            ("sortByDate", self.sort_by_date.to_string()),
            ("sortDirection", self.sort_direction.to_string()),
            ("showPhotos", self.show_photos.to_string()),
            ("compactView", self.compact_view.to_string()),
            ("maxReviews", self.max_reviews.to_string()),
            ("layout", self.layout.to_string()),
            ("spacing", self.spacing.to_string()),
            ("cardWidth", self.card_width.to_string()),
            ("showVerifiedBadge", self.show_verified_badge.to_string()),
            ("animationStyle", self.animation_style.to_string()),
        ]
    }
}

/// Widget options as they arrive on a URL. Values that are missing or fail to
/// parse are left unset and fall back to the defaults.
#[serde_as]
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetQuery {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub embed_only: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub preset: Option<ThemePreset>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub accent_color: Option<HexColor>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub filter_rating: Option<u8>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub sort_by_date: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub show_photos: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub compact_view: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub max_reviews: Option<i64>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub spacing: Option<u32>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub card_width: Option<u32>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub show_verified_badge: Option<bool>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub animation_style: Option<AnimationStyle>,
}

impl WidgetQuery {
    pub fn display_config(&self) -> DisplayConfig {
        let mut config = DisplayConfig::default();
        if let Some(preset) = self.preset {
            config.theme = preset.theme();
            config.accent_color = preset.accent_color();
        }

        let query = self;
        if let Some(theme) = query.theme { config.theme = theme; }
        if let Some(accent_color) = &query.accent_color { config.accent_color = accent_color.clone(); }
        if let Some(filter_rating) = query.filter_rating { config.filter_rating = filter_rating; }
        if let Some(sort_by_date) = query.sort_by_date { config.sort_by_date = sort_by_date; }
        if let Some(sort_direction) = query.sort_direction { config.sort_direction = sort_direction; }
        if let Some(show_photos) = query.show_photos { config.show_photos = show_photos; }
        if let Some(compact_view) = query.compact_view { config.compact_view = compact_view; }
        if let Some(max_reviews) = query.max_reviews { config.max_reviews = max_reviews; }
        if let Some(layout) = query.layout { config.layout = layout; }
        if let Some(spacing) = query.spacing { config.spacing = spacing; }
        if let Some(card_width) = query.card_width { config.card_width = card_width; }
        if let Some(show_verified_badge) = query.show_verified_badge { config.show_verified_badge = show_verified_badge; }
        if let Some(animation_style) = query.animation_style { config.animation_style = animation_style; }

        config.sanitized()
    }

    pub fn is_embed_only(&self) -> bool {
        self.embed_only.unwrap_or(false)
    }

    /// The place id, ignoring blank values.
    pub fn place_id(&self) -> Option<&str> {
        self.place_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
