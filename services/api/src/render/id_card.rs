//! services/api/src/render/id_card.rs
//!
//! The digital identity card surface, 350x550 logical pixels.

use membership_core::domain::{CardTheme, MemberRecord, OrgAssets};

use crate::config::OrgProfile;

use super::{wrap_text, xml_escape};

pub const CARD_WIDTH: u32 = 350;
pub const CARD_HEIGHT: u32 = 550;

/// Header gradient stops per theme.
fn theme_colors(theme: CardTheme) -> (&'static str, &'static str) {
    match theme {
        CardTheme::Patriotic => ("#ea580c", "#15803d"),
        CardTheme::Blue => ("#1d4ed8", "#0ea5e9"),
        CardTheme::Dark => ("#0f172a", "#334155"),
        CardTheme::Minimal => ("#64748b", "#94a3b8"),
        CardTheme::Red => ("#b91c1c", "#ef4444"),
    }
}

pub fn id_card_svg(member: &MemberRecord, assets: &OrgAssets, org: &OrgProfile) -> String {
    let (start, end) = theme_colors(assets.card_theme);
    let name = xml_escape(&member.details.full_name.to_uppercase());
    let designation = xml_escape(&member.details.designation.to_uppercase());
    let code = xml_escape(&member.membership_code);
    let location = xml_escape(&format!(
        "{}, {}",
        member.details.district, member.details.state
    ));

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<defs>
  <linearGradient id="band" x1="0" y1="0" x2="1" y2="0">
    <stop offset="0" stop-color="{start}"/>
    <stop offset="1" stop-color="{end}"/>
  </linearGradient>
  <clipPath id="photoClip"><circle cx="175" cy="188" r="60"/></clipPath>
  <clipPath id="logoClip"><circle cx="175" cy="42" r="24"/></clipPath>
</defs>
<rect width="{w}" height="{h}" rx="12" fill="#ffffff" stroke="#e2e8f0"/>
<path d="M 0 12 A 12 12 0 0 1 12 0 H 338 A 12 12 0 0 1 350 12 V 128 H 0 Z" fill="url(#band)"/>
"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        start = start,
        end = end,
    );

    // Organization logo, or a plain disc when none is uploaded.
    match &assets.logo_url {
        Some(logo) => svg.push_str(&format!(
            r##"<circle cx="175" cy="42" r="26" fill="#ffffff"/>
<image x="151" y="18" width="48" height="48" href="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#logoClip)"/>
"##,
            xml_escape(logo)
        )),
        None => svg.push_str(
            r##"<circle cx="175" cy="42" r="26" fill="#ffffff" opacity="0.9"/>
"##,
        ),
    }

    // Organization name, wrapped across the band.
    let org_lines = wrap_text(&org.name.to_uppercase(), 24);
    let mut y = 86;
    for line in org_lines.iter().take(2) {
        svg.push_str(&format!(
            r##"<text x="175" y="{y}" text-anchor="middle" fill="#ffffff" font-size="15" font-weight="bold">{}</text>
"##,
            xml_escape(line)
        ));
        y += 18;
    }

    // Photo disc overlapping the band.
    svg.push_str(r##"<circle cx="175" cy="188" r="64" fill="#ffffff"/>
"##);
    if member.details.photo_url.trim().is_empty() {
        let initial = member
            .details
            .full_name
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string();
        svg.push_str(&format!(
            r##"<circle cx="175" cy="188" r="60" fill="#e2e8f0"/>
<text x="175" y="206" text-anchor="middle" fill="#64748b" font-size="48" font-weight="bold">{}</text>
"##,
            xml_escape(&initial)
        ));
    } else {
        svg.push_str(&format!(
            r##"<image x="115" y="128" width="120" height="120" href="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#photoClip)"/>
"##,
            xml_escape(&member.details.photo_url)
        ));
    }

    // Name, designation, and the code badge.
    svg.push_str(&format!(
        r##"<text x="175" y="288" text-anchor="middle" fill="#1e293b" font-size="20" font-weight="bold">{name}</text>
<text x="175" y="310" text-anchor="middle" fill="{start}" font-size="13" font-weight="bold">{designation}</text>
<rect x="95" y="324" width="160" height="26" rx="13" fill="#f1f5f9" stroke="#e2e8f0"/>
<text x="175" y="342" text-anchor="middle" fill="#1e293b" font-size="13" font-family="monospace" font-weight="bold">ID: {code}</text>
"##,
    ));

    // Details grid.
    let rows = [
        ("DEPARTMENT", xml_escape(&member.details.department)),
        ("DOB", member.details.dob.format("%Y-%m-%d").to_string()),
        ("MOBILE", xml_escape(&member.details.mobile)),
        ("LOCATION", location),
    ];
    let mut y = 380;
    for (label, value) in rows {
        svg.push_str(&format!(
            r##"<text x="40" y="{y}" fill="#94a3b8" font-size="10" font-weight="bold">{label}</text>
<text x="310" y="{y}" text-anchor="end" fill="#334155" font-size="11">{value}</text>
<line x1="40" y1="{liney}" x2="310" y2="{liney}" stroke="#f1f5f9"/>
"##,
            liney = y + 7,
        ));
        y += 24;
    }

    // Verification panel. The QR payload is served by the links endpoint;
    // the offline surface carries the code for manual checks.
    svg.push_str(&format!(
        r##"<rect x="30" y="478" width="56" height="56" rx="4" fill="#ffffff" stroke="#e2e8f0"/>
<text x="58" y="502" text-anchor="middle" fill="#64748b" font-size="8" font-weight="bold">SCAN TO</text>
<text x="58" y="513" text-anchor="middle" fill="#64748b" font-size="8" font-weight="bold">VERIFY</text>
<text x="58" y="527" text-anchor="middle" fill="#94a3b8" font-size="6">{code}</text>
"##,
    ));

    // Authority signature and stamp corner.
    if let Some(stamp) = &assets.stamp_url {
        svg.push_str(&format!(
            r##"<image x="215" y="440" width="64" height="64" opacity="0.9" href="{}" preserveAspectRatio="xMidYMid meet"/>
"##,
            xml_escape(stamp)
        ));
    }
    match &assets.signature_url {
        Some(signature) => svg.push_str(&format!(
            r##"<image x="240" y="486" width="80" height="30" href="{}" preserveAspectRatio="xMidYMid meet"/>
"##,
            xml_escape(signature)
        )),
        None => svg.push_str(&format!(
            r##"<text x="280" y="510" text-anchor="middle" fill="#1e293b" font-size="16" font-style="italic">{}</text>
"##,
            xml_escape(&org.president_name)
        )),
    }
    svg.push_str(&format!(
        r##"<line x1="235" y1="518" x2="325" y2="518" stroke="#94a3b8"/>
<text x="280" y="530" text-anchor="middle" fill="#475569" font-size="8" font-weight="bold">{}</text>
"##,
        xml_escape(&org.president_title)
    ));

    // Bottom accent bar.
    svg.push_str(&format!(
        r##"<path d="M 0 542 H 350 V 538 A 12 12 0 0 1 338 550 H 12 A 12 12 0 0 1 0 538 Z" fill="{end}"/>
</svg>
"##,
    ));
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use membership_core::domain::OrgAssets;

    #[test]
    fn test_card_carries_identity_fields() {
        let member = testutil::approved_member();
        let svg = id_card_svg(&member, &OrgAssets::default(), &testutil::org_profile());

        assert!(svg.contains(r#"width="350" height="550""#));
        assert!(svg.contains("ASHA VERMA"));
        assert!(svg.contains("FIELD OFFICER"));
        assert!(svg.contains("ID: CSM-2026-54321"));
        assert!(svg.contains("Budaun, Uttar Pradesh"));
        assert!(svg.contains("CIVIC SERVICE MISSION"));
    }

    #[test]
    fn test_card_escapes_markup_in_names() {
        let mut member = testutil::member();
        member.details.full_name = "Shah & Sons".to_string();
        let svg = id_card_svg(&member, &OrgAssets::default(), &testutil::org_profile());

        assert!(svg.contains("SHAH &amp; SONS"));
        assert!(!svg.contains("SHAH & SONS"));
    }

    #[test]
    fn test_card_uses_placeholder_without_photo() {
        let member = testutil::member();
        let svg = id_card_svg(&member, &OrgAssets::default(), &testutil::org_profile());
        // No photo data URL and no uploaded assets, so no image element at all.
        assert!(!svg.contains("<image"));
        assert!(svg.contains(">A</text>"));
    }

    #[test]
    fn test_card_embeds_uploaded_assets() {
        let mut member = testutil::member();
        member.details.photo_url = "data:image/png;base64,AAAA".to_string();
        let assets = OrgAssets {
            logo_url: Some("data:image/png;base64,LLLL".to_string()),
            stamp_url: Some("data:image/png;base64,SSSS".to_string()),
            signature_url: Some("data:image/png;base64,GGGG".to_string()),
            ..OrgAssets::default()
        };
        let svg = id_card_svg(&member, &assets, &testutil::org_profile());

        assert!(svg.contains("data:image/png;base64,AAAA"));
        assert!(svg.contains("data:image/png;base64,LLLL"));
        assert!(svg.contains("data:image/png;base64,SSSS"));
        assert!(svg.contains("data:image/png;base64,GGGG"));
    }
}
