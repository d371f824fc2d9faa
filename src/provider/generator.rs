use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::order::{Address, Order, OrderItem, OrderStatus, Shipment};

// ============================================================================
// Mock Order Generator
// ============================================================================
//
// Builds the synthetic order collection the dashboard runs on. All randomness
// comes from the caller's rng, so a seeded rng reproduces the same orders for
// the same `now`.
//
// ============================================================================

/// Orders are spread over this many days before `now`
pub const HISTORY_DAYS: i64 = 90;

struct Customer {
    name: &'static str,
    email: &'static str,
}

struct Product {
    name: &'static str,
    price_cents: i64,
}

impl Product {
    fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }
}

const CUSTOMERS: [Customer; 8] = [
    Customer { name: "John Smith", email: "john.smith@email.com" },
    Customer { name: "Sarah Johnson", email: "sarah.j@email.com" },
    Customer { name: "Michael Brown", email: "mike.brown@email.com" },
    Customer { name: "Emily Davis", email: "emily.davis@email.com" },
    Customer { name: "David Wilson", email: "david.w@email.com" },
    Customer { name: "Lisa Anderson", email: "lisa.anderson@email.com" },
    Customer { name: "James Taylor", email: "james.taylor@email.com" },
    Customer { name: "Jennifer Martinez", email: "jen.martinez@email.com" },
];

const PRODUCTS: [Product; 8] = [
    Product { name: "Wireless Bluetooth Headphones", price_cents: 8999 },
    Product { name: "Smart Fitness Watch", price_cents: 19999 },
    Product { name: "Portable Phone Charger", price_cents: 2999 },
    Product { name: "Bluetooth Speaker", price_cents: 7999 },
    Product { name: "Laptop Stand", price_cents: 4999 },
    Product { name: "Wireless Mouse", price_cents: 3999 },
    Product { name: "USB-C Hub", price_cents: 6999 },
    Product { name: "Phone Case", price_cents: 1999 },
];

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, options: &'a [T]) -> &'a T {
    &options[rng.random_range(0..options.len())]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockOrderGenerator;

impl MockOrderGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce `count` orders dated within the last 90 days before `now`
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, now: DateTime<Utc>, rng: &mut R) -> Vec<Order> {
        let orders: Vec<Order> = (0..count)
            .map(|index| self.generate_order(index, now, rng))
            .collect();

        tracing::debug!(count = orders.len(), "Generated mock orders");
        orders
    }

    fn generate_order<R: Rng + ?Sized>(&self, index: usize, now: DateTime<Utc>, rng: &mut R) -> Order {
        let customer = pick(rng, &CUSTOMERS);
        let age_secs = rng.random_range(0..HISTORY_DAYS * 86_400);
        let order_date = now - Duration::seconds(age_secs);
        let status = *pick(rng, &OrderStatus::ALL);

        let item_count = rng.random_range(1..=3);
        let items = (0..item_count)
            .map(|_| {
                let product = pick(rng, &PRODUCTS);
                let quantity = rng.random_range(1..=3);
                OrderItem::new(
                    format!("item-{}", base36_token(rng, 9)),
                    product.name,
                    quantity,
                    product.price(),
                )
            })
            .collect();

        let shipping_address = Address {
            street: format!("{} Main St", rng.random_range(1..=9999u32)),
            city: "New York".to_string(),
            state: "NY".to_string(),
            zip_code: "10001".to_string(),
            country: "USA".to_string(),
        };

        let shipment = Shipment {
            tracking_number: status
                .is_tracked()
                .then(|| format!("TRK{}", base36_token(rng, 9).to_uppercase())),
            estimated_delivery: (status == OrderStatus::Shipped)
                .then(|| now + Duration::days(rng.random_range(1..=7))),
            actual_delivery: (status == OrderStatus::Delivered)
                .then(|| order_date + Duration::days(rng.random_range(3..=16))),
        };

        Order::new(
            format!("ORD-{:06}", index + 1),
            customer.name,
            customer.email,
            order_date,
            status,
            items,
            shipping_address,
            shipment,
        )
    }
}
