use time::macros::format_description;
use time::OffsetDateTime;
use crate::fetch::FetchState;
use crate::models::display_config::{DisplayConfig, Layout, Theme};
use crate::models::place::{Place, PlaceDetails};
use crate::models::review::Review;
use crate::widget::markup::{Element, Node};
use crate::widget::selection::select;
use crate::widget::summary::{summarize, RatingSummary, STAR_LEVELS};

const STAR: &str = "\u{2605}";
const MISSING_TEXT: &str = "(This reviewer didn't write a review)";

/// Lays out the widget for a place.
///
/// Falls back to a single placeholder when there is no place or the raw review
/// list is empty; that check happens before any filtering, so a filter that
/// hides every review still renders the header and summary.
pub fn render(place: Option<&Place>, reviews: &[Review], config: &DisplayConfig) -> Node {
    let place = match place {
        Some(place) if !reviews.is_empty() => place,
        _ => return widget_shell(config).child(empty_placeholder()).into(),
    };

    let summary = summarize(reviews, place);
    let selected = select(reviews, config);

    widget_shell(config)
        .child(header(place, reviews, &summary))
        .child(review_list(&selected, config))
        .child(
            Element::new("div")
                .class("grw-footer")
                .text("Powered by Google Places"),
        )
        .into()
}

/// Renders whichever stage a place-details fetch has reached.
pub fn render_state(state: &FetchState<PlaceDetails>, config: &DisplayConfig) -> Node {
    match state {
        FetchState::Loading => widget_shell(config)
            .child(
                Element::new("div")
                    .class("grw-status grw-loading")
                    .child(Element::new("div").class("grw-spinner"))
                    .child(Element::new("p").text("Loading widget...")),
            )
            .into(),
        FetchState::Failed { reason } => widget_shell(config)
            .child(
                Element::new("div")
                    .class("grw-status grw-error")
                    .child(Element::new("h2").text("Error"))
                    .child(Element::new("p").text(reason.as_str())),
            )
            .into(),
        FetchState::Loaded(details) => render(Some(&details.place), &details.reviews, config),
    }
}

fn widget_shell(config: &DisplayConfig) -> Element {
    let theme = match config.theme {
        Theme::Light => "grw-theme-light",
        Theme::Dark => "grw-theme-dark",
    };
    Element::new("div")
        .class(format!("grw-widget {}", theme))
        .style(format!("--grw-accent: {};", config.accent_color))
}

fn empty_placeholder() -> Element {
    Element::new("div")
        .class("grw-empty")
        .child(Element::new("p").class("grw-empty-title").text("No reviews available"))
        .child(
            Element::new("p")
                .class("grw-empty-hint")
                .text("Please check back later or try a different place."),
        )
}

fn header(place: &Place, reviews: &[Review], summary: &RatingSummary) -> Element {
    let mut header = Element::new("div")
        .class("grw-header")
        .child(Element::new("h2").class("grw-place-name").text(place.name.as_str()));

    if let Some(address) = &place.formatted_address {
        header = header.child(Element::new("p").class("grw-address").text(address.as_str()));
    }

    let average_stars = summary.average.map_or(0, |average| average.round() as usize);
    let average_text = summary
        .average
        .map_or_else(|| "-".to_string(), |average| format!("{:.1}", average));
    let total = place.user_ratings_total.unwrap_or(reviews.len() as u64);

    header
        .child(
            Element::new("div")
                .class("grw-rating-row")
                .child(stars(average_stars))
                .child(Element::new("span").class("grw-average").text(average_text))
                .child(Element::new("span").class("grw-separator").text("\u{2022}"))
                .child(
                    Element::new("span")
                        .class("grw-total")
                        .text(format!("{} reviews", group_thousands(total))),
                ),
        )
        .child(distribution(summary, reviews.len()))
}

fn distribution(summary: &RatingSummary, population: usize) -> Element {
    let rows = STAR_LEVELS.rev().map(|level| {
        let count = summary.count(level);
        let percentage = if population == 0 {
            0.0
        } else {
            count as f64 / population as f64 * 100.0
        };

        Element::new("div")
            .class("grw-distribution-row")
            .attr("data-stars", level.to_string())
            .child(
                Element::new("div")
                    .class("grw-distribution-label")
                    .text(format!("{} {}", level, STAR)),
            )
            .child(
                Element::new("div").class("grw-bar").child(
                    Element::new("div")
                        .class("grw-bar-fill")
                        .style(format!("width: {:.1}%;", percentage)),
                ),
            )
            .child(
                Element::new("div")
                    .class("grw-distribution-count")
                    .text(count.to_string()),
            )
    });

    Element::new("div").class("grw-distribution").children(rows)
}

fn review_list(selected: &[Review], config: &DisplayConfig) -> Element {
    let layout = match config.layout {
        Layout::Grid => "grw-layout-grid",
        Layout::Row => "grw-layout-row",
        Layout::Column => "grw-layout-column",
    };
    // Spacing follows the 0.25rem scale of the original utility classes.
    let gap = config.spacing.saturating_mul(4);

    Element::new("div")
        .class(format!("grw-reviews {} grw-animate-{}", layout, config.animation_style))
        .style(format!("gap: {}px;", gap))
        .children(selected.iter().map(|review| review_card(review, config)))
}

fn review_card(review: &Review, config: &DisplayConfig) -> Element {
    let mut class = String::from("grw-card");
    if config.compact_view {
        class.push_str(" grw-compact");
    }

    let mut card = Element::new("div").class(class);
    if config.layout == Layout::Row {
        card = card.style(format!("flex: 0 0 auto; width: {}px;", config.card_width));
    }

    let card_stars = review.rating.map_or(0, |rating| rating.round().max(0.0) as usize);
    let text = review
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(MISSING_TEXT);

    card.child(avatar(review, config)).child(
        Element::new("div")
            .class("grw-card-body")
            .child(
                Element::new("div")
                    .class("grw-card-header")
                    .child(Element::new("h3").class("grw-author").text(review.author_name.as_str()))
                    .child(stars(card_stars)),
            )
            .child(Element::new("div").class("grw-date").text(date_line(review)))
            .child(Element::new("p").class("grw-text").text(text)),
    )
}

fn avatar(review: &Review, config: &DisplayConfig) -> Element {
    match review.profile_photo_url.as_deref() {
        Some(photo) if config.show_photos => {
            let mut avatar = Element::new("div").class("grw-avatar").child(
                Element::new("img")
                    .attr("src", photo)
                    .attr("alt", review.author_name.as_str()),
            );
            if config.show_verified_badge {
                avatar = avatar.child(Element::new("span").class("grw-verified").text("\u{2713}"));
            }
            avatar
        }
        _ => Element::new("div")
            .class("grw-avatar")
            .child(Element::new("div").class("grw-avatar-placeholder").text("\u{1F464}")),
    }
}

fn stars(active: usize) -> Element {
    Element::new("div").class("grw-stars").children((0..5).map(|i| {
        let class = if i < active { "grw-star grw-star-active" } else { "grw-star" };
        Element::new("span").class(class).text(STAR)
    }))
}

fn date_line(review: &Review) -> String {
    let date = format_review_date(review.timestamp());
    match review.relative_time_description.as_deref() {
        Some(relative) if !relative.is_empty() => format!("{} \u{2022} {}", date, relative),
        _ => date,
    }
}

/// Long-form US date, e.g. "January 5, 2024".
pub fn format_review_date(unix_seconds: i64) -> String {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    OffsetDateTime::from_unix_timestamp(unix_seconds)
        .ok()
        .and_then(|date| date.format(&format).ok())
        .unwrap_or_default()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::markup::to_html;

    fn place() -> Place {
        Place {
            id: "abc123".to_string(),
            name: "Joe's Pizza".to_string(),
            formatted_address: Some("7 Carmine St, New York".to_string()),
            rating: None,
            user_ratings_total: Some(12_345),
        }
    }

    fn review(author: &str, rating: f64, time: i64) -> Review {
        Review {
            author_name: author.to_string(),
            rating: Some(rating),
            time: Some(time),
            text: Some(format!("{} liked it", author)),
            profile_photo_url: Some(format!("https://photos.example/{}.png", author)),
            relative_time_description: Some("a week ago".to_string()),
        }
    }

    fn reviews() -> Vec<Review> {
        vec![
            review("ana", 5.0, 1_700_000_000),
            review("ben", 3.0, 1_700_100_000),
            review("cy", 4.0, 1_699_900_000),
        ]
    }

    fn card_authors(node: &Node) -> Vec<String> {
        let list = node.find_by_class("grw-reviews").unwrap();
        list.children
            .iter()
            .map(|card| card.find_by_class("grw-author").unwrap().children[0].text_content())
            .collect()
    }

    #[test]
    fn empty_reviews_render_placeholder_whatever_the_config() {
        for config in [
            DisplayConfig::default(),
            DisplayConfig {
                theme: Theme::Dark,
                layout: Layout::Row,
                max_reviews: 0,
                ..DisplayConfig::default()
            },
        ] {
            let node = render(Some(&place()), &[], &config);
            assert!(node.find_by_class("grw-empty").is_some());
            assert!(node.find_by_class("grw-header").is_none());
            assert!(node.text_content().contains("No reviews available"));
        }
    }

    #[test]
    fn missing_place_renders_placeholder() {
        let node = render(None, &reviews(), &DisplayConfig::default());
        assert!(node.find_by_class("grw-empty").is_some());
    }

    #[test]
    fn cards_follow_the_selection_pipeline() {
        let node = render(Some(&place()), &reviews(), &DisplayConfig::default());
        assert_eq!(card_authors(&node), vec!["ben", "ana", "cy"]);

        let config = DisplayConfig {
            filter_rating: 4,
            max_reviews: 1,
            ..DisplayConfig::default()
        };
        let node = render(Some(&place()), &reviews(), &config);
        assert_eq!(card_authors(&node), vec!["ana"]);
    }

    #[test]
    fn summary_reflects_the_unfiltered_population() {
        let config = DisplayConfig {
            filter_rating: 5,
            ..DisplayConfig::default()
        };
        let node = render(Some(&place()), &reviews(), &config);
        let average = node.find_by_class("grw-average").unwrap();
        assert_eq!(average.children[0].text_content(), "4.0");
        let total = node.find_by_class("grw-total").unwrap();
        assert_eq!(total.children[0].text_content(), "12,345 reviews");
        assert_eq!(node.count_by_class("grw-distribution-row"), 5);
        assert_eq!(node.count_by_class("grw-card"), 1);
    }

    #[test]
    fn filter_hiding_everything_keeps_header() {
        let low = vec![review("dee", 1.0, 10)];
        let config = DisplayConfig {
            filter_rating: 5,
            ..DisplayConfig::default()
        };
        let node = render(Some(&place()), &low, &config);
        assert!(node.find_by_class("grw-header").is_some());
        assert!(node.find_by_class("grw-empty").is_none());
        assert_eq!(node.count_by_class("grw-card"), 0);
    }

    #[test]
    fn presentation_options_shape_cards() {
        let config = DisplayConfig {
            layout: Layout::Row,
            card_width: 320,
            compact_view: true,
            show_photos: false,
            ..DisplayConfig::default()
        };
        let node = render(Some(&place()), &reviews(), &config);
        let card = node.find_by_class("grw-card").unwrap();
        assert!(card.has_class("grw-compact"));
        assert_eq!(card.attrs["style"], "flex: 0 0 auto; width: 320px;");
        assert!(node.find_by_class("grw-avatar-placeholder").is_some());
        assert!(node.find_by_class("grw-verified").is_none());
        assert!(node.find_by_class("grw-layout-row").is_some());
    }

    #[test]
    fn oversized_spacing_saturates() {
        let config = DisplayConfig {
            spacing: u32::MAX,
            ..DisplayConfig::default()
        };
        let node = render(Some(&place()), &reviews()[..1], &config);
        let list = node.find_by_class("grw-reviews").unwrap();
        assert_eq!(list.attrs["style"], format!("gap: {}px;", u32::MAX));
    }

    #[test]
    fn photos_carry_verified_badge() {
        let node = render(Some(&place()), &reviews(), &DisplayConfig::default());
        assert_eq!(node.count_by_class("grw-verified"), 3);
        let html = to_html(&node);
        assert!(html.contains("src=\"https://photos.example/ana.png\""));
    }

    #[test]
    fn rendering_is_idempotent() {
        let config = DisplayConfig::default();
        assert_eq!(
            to_html(&render(Some(&place()), &reviews(), &config)),
            to_html(&render(Some(&place()), &reviews(), &config))
        );
    }

    #[test]
    fn review_text_is_escaped() {
        let mut hostile = review("eve", 5.0, 1);
        hostile.text = Some("<script>alert(1)</script>".to_string());
        let html = to_html(&render(Some(&place()), &[hostile], &DisplayConfig::default()));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_text_uses_fallback_copy() {
        let mut silent = review("sam", 4.0, 1);
        silent.text = None;
        let node = render(Some(&place()), &[silent], &DisplayConfig::default());
        assert!(node.text_content().contains(MISSING_TEXT));
    }

    #[test]
    fn fetch_states_render_their_own_shells() {
        let config = DisplayConfig::default();
        let loading = render_state(&FetchState::Loading, &config);
        assert!(loading.text_content().contains("Loading widget..."));

        let failed = render_state(&FetchState::failed("Failed to load place details"), &config);
        assert!(failed.find_by_class("grw-error").is_some());
        assert!(failed.text_content().contains("Failed to load place details"));

        let details = PlaceDetails { place: place(), reviews: reviews() };
        let loaded = render_state(&FetchState::Loaded(details), &config);
        assert_eq!(loaded.count_by_class("grw-card"), 3);
    }

    #[test]
    fn formats_dates_in_long_form() {
        assert_eq!(format_review_date(1_704_412_800), "January 5, 2024");
        assert_eq!(format_review_date(0), "January 1, 1970");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
