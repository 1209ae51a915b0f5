//! Item card widget
//!
//! Renders the details of one catalog entry: tags, stats, pricing and note.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::catalog::{CatalogEntry, ItemRecord};

/// Get the display color for a rarity label
pub fn rarity_color(rarity: &str) -> Color {
    match rarity {
        "Common" => Color::Rgb(160, 160, 170),
        "Uncommon" => Color::Rgb(100, 220, 100),
        "Rare" => Color::Rgb(100, 150, 255),
        "Very Rare" => Color::Rgb(190, 120, 255),
        "Legendary" => Color::Rgb(255, 160, 60),
        "Mythic" => Color::Rgb(255, 90, 90),
        _ => Color::Rgb(160, 160, 170),
    }
}

/// Get the badge color for an inferred tier
pub fn tier_color(tier: u32) -> Color {
    match tier {
        1 => Color::Rgb(110, 110, 120),
        2 => Color::Rgb(60, 160, 80),
        3 => Color::Rgb(60, 110, 220),
        4 => Color::Rgb(150, 80, 220),
        5 => Color::Rgb(230, 120, 40),
        6 => Color::Rgb(210, 50, 50),
        7 => Color::Rgb(230, 200, 40),
        _ => Color::Rgb(120, 120, 130),
    }
}

/// Color for an entry's name: its rarity color, or white
pub fn name_color(entry: &CatalogEntry) -> Color {
    entry.rarity().map(|r| rarity_color(r)).unwrap_or(Color::White)
}

/// Format a coin amount with thousands separators and at most two decimals,
/// e.g. `1234567.5` -> `1,234,567.5`
pub fn format_coins(amount: f64) -> String {
    let text = format!("{:.2}", amount.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    let sign = if amount < 0.0 && text != "0.00" { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Format a stat value without a trailing `.0`
fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Styled lines of an item card
pub fn item_card_lines(entry: &CatalogEntry, expanded: bool) -> Vec<(String, Style)> {
    let mut lines = Vec::new();
    let dim = Style::default().fg(Color::DarkGray);
    let gold = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    lines.push((
        entry.name().to_string(),
        Style::default().fg(name_color(entry)).add_modifier(Modifier::BOLD),
    ));

    // Badges
    let category_style = if matches!(entry.record, ItemRecord::Potion(_)) {
        Style::default().fg(Color::Rgb(200, 140, 255))
    } else {
        Style::default().fg(Color::Gray)
    };
    lines.push((format!("[{}]", entry.category), category_style));
    if let Some(tier) = entry.tier() {
        lines.push((format!("Tier {}", tier), Style::default().fg(tier_color(tier))));
    }
    if let Some(rarity) = entry.rarity() {
        lines.push((rarity.clone(), Style::default().fg(rarity_color(rarity))));
    }
    if let Some(biome) = entry.record.biome_progression() {
        lines.push((format!("Biome {}", biome), Style::default().fg(Color::Rgb(120, 170, 255))));
    }
    if let Some(set) = entry.record.set() {
        lines.push((format!("Set {}", set), Style::default().fg(Color::Rgb(140, 140, 255))));
    }

    lines.push((String::new(), dim));

    // Stats
    match &entry.record {
        ItemRecord::Armor(armor) => {
            lines.push((
                format!("Armor: {}-{}", format_stat(armor.armor_q1), format_stat(armor.armor_q4)),
                Style::default().fg(Color::Gray),
            ));
        }
        ItemRecord::Food(food) => {
            lines.push((format!("Health: {}", format_stat(food.health)), Style::default().fg(Color::Rgb(255, 110, 110))));
            lines.push((format!("Stamina: {}", format_stat(food.stamina)), Style::default().fg(Color::Rgb(110, 220, 110))));
            if food.eitr > 0.0 {
                lines.push((format!("Eitr: {}", format_stat(food.eitr)), Style::default().fg(Color::Rgb(120, 150, 255))));
            }
            lines.push((format!("Total: {}", format_stat(food.total_stats())), Style::default().fg(Color::Yellow)));
        }
        ItemRecord::Weapon(weapon) => {
            if let Some(damage) = weapon.damage.as_ref().filter(|d| !d.is_empty()) {
                let parts: Vec<String> = damage.iter().map(|(kind, value)| format!("{}: {}", kind, value)).collect();
                lines.push((parts.join(", "), Style::default().fg(Color::Rgb(255, 160, 80))));
            }
            if let Some(primary) = weapon.stamina_primary {
                let stamina = match weapon.stamina_secondary {
                    Some(secondary) => format!("Stamina: {} / {}", format_stat(primary), format_stat(secondary)),
                    None => format!("Stamina: {}", format_stat(primary)),
                };
                lines.push((stamina, Style::default().fg(Color::Rgb(110, 220, 110))));
            }
            if let Some(knockback) = weapon.knockback {
                lines.push((format!("Knockback: {}", format_stat(knockback)), Style::default().fg(Color::Gray)));
            }
        }
        ItemRecord::Potion(_) => {
            lines.push(("Consumable Potion/Mead".to_string(), Style::default().fg(Color::Rgb(200, 140, 255))));
        }
    }

    lines.push((String::new(), dim));

    // Pricing
    match &entry.record {
        ItemRecord::Armor(armor) if entry.has_quality_pricing() => {
            let marker = if expanded { "[-]" } else { "[+]" };
            lines.push((format!("Quality Pricing {}", marker), gold));
            if expanded {
                for (quality, price) in armor.quality_prices() {
                    lines.push((format!("  Q{}: {}", quality, format_coins(price)), gold));
                }
            } else {
                lines.push((
                    format!("{} - {} coins", format_coins(entry.effective_price()), format_coins(armor.price_q4)),
                    gold,
                ));
            }
        }
        _ => lines.push((format!("{} coins", format_coins(entry.effective_price())), gold)),
    }

    if let Some(note) = entry.record.note() {
        lines.push((String::new(), dim));
        lines.push((
            format!("Note: {}", note),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
    }

    lines
}

/// Render item details panel
pub fn render_item_details(entry: &CatalogEntry, expanded: bool, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Item Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));

    let inner = block.inner(area);
    block.render(area, buf);

    let width = inner.width as usize;
    for (y, (text, style)) in (inner.y..inner.y + inner.height).zip(item_card_lines(entry, expanded)) {
        buf.set_stringn(inner.x, y, &text, width, style);
    }
}

/// Render help text for browser controls
pub fn render_help(area: Rect, buf: &mut Buffer) {
    let help_lines = [
        ("/", "Search"),
        ("c", "Category"),
        ("r", "Rarity"),
        ("t", "Tier"),
        ("+/-", "Max price"),
        ("s", "Sort"),
        ("x", "Clear filters"),
        ("Enter", "Expand pricing"),
        ("q", "Quit"),
    ];

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::DarkGray);

    let mut x = area.x;
    let right = area.x + area.width;
    for (key, desc) in help_lines {
        let needed = (key.len() + desc.len() + 3) as u16;
        if x + needed > right {
            break;
        }
        buf.set_string(x, area.y, key, key_style);
        buf.set_string(x + key.len() as u16 + 1, area.y, desc, desc_style);
        x += needed;
    }
}
