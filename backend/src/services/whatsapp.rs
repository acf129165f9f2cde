//! WhatsApp handoff: renders the Indonesian order summary and the
//! click-to-chat link the storefront opens after checkout.
//!
//! No API integration; the customer's own WhatsApp client sends the text.

use rust_decimal::Decimal;

use crate::services::order::OrderWithDetails;
use shared::models::StoreSettings;
use shared::types::PaymentMethod;

/// Amounts in messages use Indonesian formatting: "Rp52.000",
/// thousands separated with dots, no decimal places.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let negative = rounded.is_sign_negative();
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp{grouped}")
    } else {
        format!("Rp{grouped}")
    }
}

fn payment_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "Tunai",
        PaymentMethod::Transfer => "Transfer",
    }
}

/// Render the order as a WhatsApp-formatted Indonesian message
pub fn order_message(order: &OrderWithDetails, settings: &StoreSettings) -> String {
    let mut lines = Vec::new();
    lines.push(format!("*Pesanan Baru dari {}*", settings.store_name));
    lines.push(String::new());
    lines.push(format!("No. Pesanan: {}", order.order.order_number));
    lines.push(format!("Nama: {}", order.order.customer_name));
    lines.push(format!("No. HP: {}", order.order.customer_phone));
    lines.push(String::new());
    lines.push("*Detail Pesanan:*".to_string());

    for (i, item) in order.items.iter().enumerate() {
        lines.push(format!(
            "{}. {} ({}) x{} = {}",
            i + 1,
            item.coffee_name,
            item.variant_size,
            item.quantity,
            format_rupiah(item.subtotal)
        ));
        if let Some(notes) = item.item_notes.as_deref().filter(|n| !n.trim().is_empty()) {
            lines.push(format!("   Catatan: {}", notes.trim()));
        }
    }

    if !order.additional_fees.is_empty() {
        lines.push(String::new());
        lines.push("*Biaya Tambahan:*".to_string());
        for fee in &order.additional_fees {
            lines.push(format!("- {}: {}", fee.fee_name, format_rupiah(fee.fee_amount)));
        }
    }

    lines.push(String::new());
    lines.push(format!("*Total: {}*", format_rupiah(order.order.total_amount)));
    lines.push(format!(
        "Metode Pembayaran: {}",
        payment_label(order.order.payment_method)
    ));

    if let Some(pickup) = order.order.pickup_time {
        lines.push(format!(
            "Waktu Ambil: {}",
            pickup.format("%d-%m-%Y %H:%M")
        ));
    }
    if let Some(notes) = order
        .order
        .customer_notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
    {
        lines.push(format!("Catatan: {}", notes.trim()));
    }

    if !settings.pickup_address.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!("Alamat Pengambilan: {}", settings.pickup_address));
        if let Some(map_link) = settings
            .pickup_map_link
            .as_deref()
            .filter(|l| !l.trim().is_empty())
        {
            lines.push(format!("Peta: {}", map_link));
        }
    }

    lines.join("\n")
}

/// Build the wa.me click-to-chat URL with the message URL-encoded
pub fn handoff_link(admin_whatsapp: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        admin_whatsapp,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use shared::models::{AdditionalFee, Order, OrderItem};
    use shared::types::OrderStatus;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_order() -> OrderWithDetails {
        let order_id = Uuid::new_v4();
        OrderWithDetails {
            order: Order {
                id: order_id,
                order_number: "ORD-20260830-0001".to_string(),
                customer_name: "Budi".to_string(),
                customer_phone: "081234567890".to_string(),
                customer_notes: None,
                total_amount: dec("52000"),
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Cash,
                pickup_time: None,
                whatsapp_sent: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            items: vec![OrderItem {
                id: Uuid::new_v4(),
                order_id,
                coffee_id: None,
                variant_id: None,
                coffee_name: "Kopi Susu Gula Aren".to_string(),
                variant_size: "Regular".to_string(),
                price: dec("25000"),
                quantity: 2,
                subtotal: dec("50000"),
                item_notes: None,
            }],
            additional_fees: vec![AdditionalFee {
                id: Uuid::new_v4(),
                order_id,
                fee_name: "Packaging".to_string(),
                fee_amount: dec("2000"),
            }],
        }
    }

    fn sample_settings() -> StoreSettings {
        StoreSettings {
            admin_whatsapp: "6281234567890".to_string(),
            store_name: "Kopi Kita".to_string(),
            currency: "IDR".to_string(),
            pickup_address: "Jl. Melati No. 5".to_string(),
            pickup_coordinates: None,
            pickup_map_link: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rupiah_groups_thousands_with_dots() {
        assert_eq!(format_rupiah(dec("52000")), "Rp52.000");
        assert_eq!(format_rupiah(dec("1250000")), "Rp1.250.000");
        assert_eq!(format_rupiah(dec("999")), "Rp999");
        assert_eq!(format_rupiah(dec("0")), "Rp0");
        assert_eq!(format_rupiah(dec("-5000")), "-Rp5.000");
    }

    #[test]
    fn message_carries_order_number_items_and_total() {
        let message = order_message(&sample_order(), &sample_settings());
        assert!(message.starts_with("*Pesanan Baru dari Kopi Kita*"));
        assert!(message.contains("No. Pesanan: ORD-20260830-0001"));
        assert!(message.contains("1. Kopi Susu Gula Aren (Regular) x2 = Rp50.000"));
        assert!(message.contains("- Packaging: Rp2.000"));
        assert!(message.contains("*Total: Rp52.000*"));
        assert!(message.contains("Metode Pembayaran: Tunai"));
        assert!(message.contains("Alamat Pengambilan: Jl. Melati No. 5"));
    }

    #[test]
    fn link_targets_store_number_and_encodes_text() {
        let link = handoff_link("6281234567890", "Pesanan Baru: Rp52.000");
        assert!(link.starts_with("https://wa.me/6281234567890?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("Rp52.000"));
    }
}
