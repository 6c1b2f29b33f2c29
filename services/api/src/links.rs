//! services/api/src/links.rs
//!
//! Builders for the external deep links handed to members: the remotely
//! rendered verification QR, the UPI payment link and its QR, and the
//! messaging link for submitting payment proof. No QR is generated locally;
//! the payload is embedded in a URL for the remote renderer.

use membership_core::domain::MemberRecord;

use crate::config::PaymentChannel;

/// URL of a QR image encoding the card-verification payload
/// (member name, membership code, mobile).
pub fn verification_qr_url(qr_api_base: &str, org_name: &str, member: &MemberRecord) -> String {
    let payload = format!(
        "{} MEMBER: {} ({}) - {}",
        org_name.to_uppercase(),
        member.details.full_name,
        member.membership_code,
        member.details.mobile
    );
    format!("{}?size=150x150&data={}", qr_api_base, urlencoding::encode(&payload))
}

/// UPI deep link for the membership fee.
pub fn upi_link(payment: &PaymentChannel, org_name: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu=INR",
        payment.upi_id,
        urlencoding::encode(org_name),
        payment.fee_amount
    )
}

/// URL of a QR image encoding the UPI payment link.
pub fn payment_qr_url(qr_api_base: &str, payment: &PaymentChannel, org_name: &str) -> String {
    format!(
        "{}?size=250x250&data={}",
        qr_api_base,
        urlencoding::encode(&upi_link(payment, org_name))
    )
}

/// Messaging deep link prefilled with the payment-proof message. Verification
/// of the proof itself stays manual.
pub fn payment_proof_link(payment: &PaymentChannel, member: &MemberRecord) -> String {
    let message = format!(
        "Hello, I have paid Rs {} for my Premium Membership.\nName: {}\nID: {}\nPlease verify and approve my account.\n(Attach Screenshot Here)",
        payment.fee_amount, member.details.full_name, member.membership_code
    );
    format!(
        "https://wa.me/{}?text={}",
        payment.whatsapp_number,
        urlencoding::encode(&message)
    )
}
