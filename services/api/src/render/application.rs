//! services/api/src/render/application.rs
//!
//! The printable membership application form, A4 at 96 dpi.

use membership_core::domain::MemberRecord;

use crate::config::OrgProfile;

use super::{wrap_text, xml_escape};

pub const FORM_WIDTH: u32 = 794;
pub const FORM_HEIGHT: u32 = 1123;

const BODY_WRAP: usize = 88;

pub fn application_form_svg(member: &MemberRecord, org: &OrgProfile) -> String {
    let details = &member.details;
    let intro = format!(
        "I, {}, son/daughter of {}, resident of {}, Post {}, Tehsil {}, District {}, {}, \
         hereby apply for membership of the mission.",
        details.full_name,
        details.father_name,
        details.village,
        details.post,
        details.block,
        details.district,
        details.state,
    );
    let pledge = format!(
        "I am acquainted with the objectives, principles, and working of the {}, and I pledge \
         to contribute to its work in the public interest with honesty, devotion, and \
         accountability, remaining fully committed to the mission's objectives. I shall \
         discharge any responsibility entrusted to me by the mission faithfully, to the best \
         of my ability and competence.",
        org.name,
    );

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="serif">
<rect width="{w}" height="{h}" fill="#ffffff"/>
<text x="397" y="84" text-anchor="middle" fill="#0f172a" font-size="17" font-weight="bold">Office : {address}</text>
<text x="397" y="108" text-anchor="middle" fill="#0f172a" font-size="14" font-weight="bold">Mobile : {phone}</text>
<line x1="95" y1="126" x2="699" y2="126" stroke="#0f172a" stroke-width="2"/>
<text x="95" y="170" fill="#1e293b" font-size="14">To,</text>
<text x="95" y="192" fill="#0f172a" font-size="14" font-weight="bold">The President / Secretary,</text>
<text x="95" y="214" fill="#0f172a" font-size="14" font-weight="bold">{org_name},</text>
<text x="397" y="262" text-anchor="middle" fill="#0f172a" font-size="14" font-weight="bold">Subject : Application for membership of the mission.</text>
<line x1="230" y1="268" x2="564" y2="268" stroke="#0f172a"/>
<text x="95" y="306" fill="#1e293b" font-size="14">Respected Sir/Madam,</text>
"##,
        w = FORM_WIDTH,
        h = FORM_HEIGHT,
        address = xml_escape(&org.address),
        phone = xml_escape(&org.contact_phone),
        org_name = xml_escape(&org.name),
    );

    let mut y = 334;
    for paragraph in [intro.as_str(), pledge.as_str()] {
        for line in wrap_text(paragraph, BODY_WRAP) {
            svg.push_str(&format!(
                r##"<text x="95" y="{y}" fill="#1e293b" font-size="13">{}</text>
"##,
                xml_escape(&line)
            ));
            y += 20;
        }
        y += 12;
    }

    // Applicant details, left column.
    y += 16;
    svg.push_str(&format!(
        r##"<text x="95" y="{y}" fill="#0f172a" font-size="14" font-weight="bold">Sincerely,</text>
"##,
    ));
    let grid_top = y + 30;
    let rows = [
        ("Name", xml_escape(&details.full_name)),
        ("Father/Husband", xml_escape(&details.father_name)),
        ("Date of Birth", details.dob.format("%Y-%m-%d").to_string()),
        ("Mobile", xml_escape(&details.mobile)),
        (
            "Village / Post",
            xml_escape(&format!("{}, {}", details.village, details.post)),
        ),
        ("Block / Tehsil", xml_escape(&details.block)),
        ("District", xml_escape(&details.district)),
        ("State", xml_escape(&details.state)),
        ("ID No.", xml_escape(&member.membership_code)),
        ("E-mail", xml_escape(&member.email)),
    ];
    let mut row_y = grid_top;
    for (label, value) in rows {
        svg.push_str(&format!(
            r##"<text x="95" y="{row_y}" fill="#0f172a" font-size="13"><tspan font-weight="bold">{label} :</tspan> {value}</text>
"##,
        ));
        row_y += 24;
    }

    // Photo box and applicant signature, right column.
    svg.push_str(&format!(
        r##"<rect x="580" y="{photo_y}" width="96" height="112" fill="#f8fafc" stroke="#94a3b8"/>
"##,
        photo_y = grid_top - 14,
    ));
    if details.photo_url.trim().is_empty() {
        svg.push_str(&format!(
            r##"<text x="628" y="{label_y}" text-anchor="middle" fill="#94a3b8" font-size="11">PHOTO</text>
"##,
            label_y = grid_top + 46,
        ));
    } else {
        svg.push_str(&format!(
            r##"<image x="581" y="{img_y}" width="94" height="110" href="{}" preserveAspectRatio="xMidYMid slice"/>
"##,
            xml_escape(&details.photo_url),
            img_y = grid_top - 13,
        ));
    }
    svg.push_str(&format!(
        r##"<line x1="566" y1="{rule_y}" x2="690" y2="{rule_y}" stroke="#0f172a"/>
<text x="628" y="{name_y}" text-anchor="middle" fill="#0f172a" font-size="12" font-weight="bold">{name}</text>
<text x="628" y="{sign_y}" text-anchor="middle" fill="#475569" font-size="11">(Applicant&apos;s Signature)</text>
"##,
        rule_y = grid_top + 146,
        name_y = grid_top + 164,
        sign_y = grid_top + 180,
        name = xml_escape(&details.full_name),
    ));

    // Declaration.
    let decl_y = row_y.max(grid_top + 200) + 30;
    svg.push_str(&format!(
        r##"<line x1="95" y1="{rule_y}" x2="699" y2="{rule_y}" stroke="#0f172a" stroke-width="2"/>
<text x="397" y="{head_y}" text-anchor="middle" fill="#0f172a" font-size="16" font-weight="bold">Declaration</text>
"##,
        rule_y = decl_y,
        head_y = decl_y + 30,
    ));
    let declaration = "I hereby declare that the information given above is true to the best of \
                       my knowledge and belief. If any of it is found to be false, the \
                       organization may cancel my membership.";
    let mut line_y = decl_y + 58;
    for line in wrap_text(declaration, BODY_WRAP) {
        svg.push_str(&format!(
            r##"<text x="95" y="{line_y}" fill="#1e293b" font-size="13">{}</text>
"##,
            xml_escape(&line)
        ));
        line_y += 20;
    }
    svg.push_str(&format!(
        r##"<text x="95" y="{date_y}" fill="#1e293b" font-size="13"><tspan font-weight="bold">Date :</tspan> {joined}</text>
<text x="397" y="{date_y}" fill="#1e293b" font-size="13"><tspan font-weight="bold">Place :</tspan> {district}</text>
</svg>
"##,
        date_y = line_y + 24,
        joined = details.joining_date.format("%Y-%m-%d"),
        district = xml_escape(&details.district),
    ));
    svg
}
