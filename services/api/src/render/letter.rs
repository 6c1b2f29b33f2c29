//! services/api/src/render/letter.rs
//!
//! The appointment letter surface, A4 at 96 dpi (794x1123 logical pixels).

use chrono::Utc;
use membership_core::domain::{MemberRecord, OrgAssets};

use crate::config::OrgProfile;

use super::{wrap_text, xml_escape};

pub const LETTER_WIDTH: u32 = 794;
pub const LETTER_HEIGHT: u32 = 1123;

const BODY_WRAP: usize = 92;

/// Splits stored letter content into displayable paragraphs, dropping
/// subject lines and organization headers that older generations sometimes
/// embedded. Falls back to the unfiltered lines if filtering empties the
/// letter entirely.
fn body_paragraphs<'a>(content: &'a str, org_name: &str) -> Vec<&'a str> {
    let lowered_org = org_name.to_lowercase();
    let filtered: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| !p.to_lowercase().starts_with("subject:"))
        .filter(|p| !p.to_lowercase().contains(&lowered_org))
        .collect();
    if filtered.is_empty() {
        content
            .lines()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    } else {
        filtered
    }
}

pub fn letter_svg(member: &MemberRecord, assets: &OrgAssets, org: &OrgProfile) -> String {
    let content = member
        .documents
        .joining_letter_content
        .as_deref()
        .unwrap_or("Letter not yet generated.");
    let paragraphs = body_paragraphs(content, &org.name);

    let serial = member
        .membership_code
        .rsplit('-')
        .next()
        .unwrap_or("000");
    let reference = format!(
        "{}/HR/{}/{}",
        org.code_prefix,
        Utc::now().format("%Y"),
        serial
    );
    let today = Utc::now().format("%d %B %Y").to_string();
    let address_line = format!(
        "{}, {}, {}",
        member.details.village, member.details.post, member.details.district
    );

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="serif">
<rect width="{w}" height="{h}" fill="#ffffff"/>
"##,
        w = LETTER_WIDTH,
        h = LETTER_HEIGHT,
    );

    // Letterhead.
    let mut y = 78;
    for line in wrap_text(&org.name.to_uppercase(), 26).iter().take(2) {
        svg.push_str(&format!(
            r##"<text x="60" y="{y}" fill="#0f172a" font-size="28" font-weight="bold" font-family="sans-serif">{}</text>
"##,
            xml_escape(line)
        ));
        y += 32;
    }
    svg.push_str(&format!(
        r##"<text x="60" y="{y1}" fill="#475569" font-size="11" font-weight="bold" font-family="sans-serif">{address}</text>
<text x="60" y="{y2}" fill="#64748b" font-size="11" font-family="sans-serif">{email} | {phone}</text>
<text x="734" y="86" text-anchor="end" fill="#e2e8f0" font-size="34" font-weight="bold" font-family="sans-serif">APPOINTMENT</text>
<text x="734" y="122" text-anchor="end" fill="#e2e8f0" font-size="34" font-weight="bold" font-family="sans-serif">LETTER</text>
<line x1="60" y1="158" x2="734" y2="158" stroke="#cbd5e1" stroke-width="2"/>
"##,
        y1 = y + 4,
        y2 = y + 20,
        address = xml_escape(&org.address),
        email = xml_escape(&org.contact_email),
        phone = xml_escape(&org.contact_phone),
    ));

    // Reference and date row.
    svg.push_str(&format!(
        r##"<text x="60" y="192" fill="#1e293b" font-size="13" font-family="sans-serif"><tspan font-weight="bold">Ref:</tspan> {reference}</text>
<text x="734" y="192" text-anchor="end" fill="#1e293b" font-size="13" font-family="sans-serif"><tspan font-weight="bold">Date:</tspan> {today}</text>
"##,
        reference = xml_escape(&reference),
    ));

    // Recipient.
    svg.push_str(&format!(
        r##"<text x="60" y="240" fill="#0f172a" font-size="16" font-weight="bold">{name}</text>
<text x="60" y="260" fill="#334155" font-size="13">{address_line}</text>
<text x="60" y="280" fill="#334155" font-size="13">Mobile: {mobile}</text>
"##,
        name = xml_escape(&member.details.full_name),
        address_line = xml_escape(&address_line),
        mobile = xml_escape(&member.details.mobile),
    ));

    // Subject.
    svg.push_str(&format!(
        r##"<text x="60" y="322" fill="#0f172a" font-size="14" font-weight="bold">Subject: Confirmation of Membership/Appointment as {designation}</text>
<line x1="60" y1="328" x2="620" y2="328" stroke="#94a3b8"/>
"##,
        designation = xml_escape(&member.details.designation),
    ));

    // Body paragraphs.
    let mut y = 362;
    for paragraph in &paragraphs {
        for line in wrap_text(paragraph, BODY_WRAP) {
            svg.push_str(&format!(
                r##"<text x="60" y="{y}" fill="#1e293b" font-size="13">{}</text>
"##,
                xml_escape(&line)
            ));
            y += 20;
        }
        y += 14;
    }

    // Signatures.
    let sig_y = (y + 40).max(880);
    svg.push_str(&format!(
        r##"<text x="60" y="{accepted_y}" fill="#0f172a" font-size="13" font-weight="bold">Accepted By:</text>
<line x1="60" y1="{rule_y}" x2="250" y2="{rule_y}" stroke="#94a3b8"/>
<text x="60" y="{name_y}" fill="#0f172a" font-size="13" font-weight="bold">{name}</text>
<text x="60" y="{sign_y}" fill="#64748b" font-size="11">(Signature)</text>
<text x="734" y="{accepted_y}" text-anchor="end" fill="#0f172a" font-size="13" font-weight="bold">For {org_name}</text>
"##,
        accepted_y = sig_y,
        rule_y = sig_y + 64,
        name_y = sig_y + 82,
        sign_y = sig_y + 98,
        name = xml_escape(&member.details.full_name),
        org_name = xml_escape(&org.name),
    ));

    if let Some(stamp) = &assets.stamp_url {
        svg.push_str(&format!(
            r##"<image x="530" y="{stamp_y}" width="90" height="90" opacity="0.9" href="{}" preserveAspectRatio="xMidYMid meet"/>
"##,
            xml_escape(stamp),
            stamp_y = sig_y + 8,
        ));
    }
    match &assets.signature_url {
        Some(signature) => svg.push_str(&format!(
            r##"<image x="610" y="{img_y}" width="110" height="40" href="{}" preserveAspectRatio="xMidYMid meet"/>
"##,
            xml_escape(signature),
            img_y = sig_y + 18,
        )),
        None => svg.push_str(&format!(
            r##"<text x="680" y="{text_y}" text-anchor="middle" fill="#0f172a" font-size="22" font-style="italic">{}</text>
"##,
            xml_escape(&org.president_name),
            text_y = sig_y + 48,
        )),
    }
    svg.push_str(&format!(
        r##"<line x1="510" y1="{rule_y}" x2="734" y2="{rule_y}" stroke="#94a3b8"/>
<text x="734" y="{name_y}" text-anchor="end" fill="#0f172a" font-size="13" font-weight="bold">{president}</text>
<text x="734" y="{title_y}" text-anchor="end" fill="#475569" font-size="11" font-weight="bold">{title}</text>
"##,
        rule_y = sig_y + 64,
        name_y = sig_y + 82,
        title_y = sig_y + 98,
        president = xml_escape(&org.president_name),
        title = xml_escape(&org.president_title),
    ));

    // Footer.
    svg.push_str(&format!(
        r##"<line x1="99" y1="1058" x2="695" y2="1058" stroke="#e2e8f0"/>
<text x="397" y="1078" text-anchor="middle" fill="#94a3b8" font-size="10" font-family="sans-serif">{org_name} | {address}</text>
<text x="397" y="1094" text-anchor="middle" fill="#cbd5e1" font-size="9" font-family="sans-serif">This is a computer-generated document.</text>
</svg>
"##,
        org_name = xml_escape(&org.name.to_uppercase()),
        address = xml_escape(&org.address),
    ));
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn test_letter_lays_out_identity_and_subject() {
        let member = testutil::approved_member();
        let svg = letter_svg(&member, &OrgAssets::default(), &testutil::org_profile());

        assert!(svg.contains(r#"width="794" height="1123""#));
        assert!(svg.contains("Asha Verma"));
        assert!(svg.contains("Subject: Confirmation of Membership/Appointment as Field Officer"));
        assert!(svg.contains("CSM/HR/"));
        assert!(svg.contains("/54321"));
        assert!(svg.contains("Mobile: 9000000001"));
    }

    #[test]
    fn test_letter_without_content_shows_notice() {
        let member = testutil::member();
        let svg = letter_svg(&member, &OrgAssets::default(), &testutil::org_profile());
        assert!(svg.contains("Letter not yet generated."));
    }

    #[test]
    fn test_body_filter_drops_subject_and_header_lines() {
        let paragraphs = body_paragraphs(
            "Subject: Appointment\nCivic Service Mission\nDear Asha,\n\nWelcome aboard.",
            "Civic Service Mission",
        );
        assert_eq!(paragraphs, vec!["Dear Asha,", "Welcome aboard."]);
    }

    #[test]
    fn test_body_filter_keeps_content_when_everything_matches() {
        let paragraphs = body_paragraphs("Subject: only a subject line", "Civic Service Mission");
        assert_eq!(paragraphs, vec!["Subject: only a subject line"]);
    }
}
