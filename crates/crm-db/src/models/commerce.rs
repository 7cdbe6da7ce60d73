use crate::{
    entity::entity,
    relation::{BelongsTo, HasMany, HasOne},
    rules,
};

use super::{Company, People, User};

entity! {
    /// A sales pipeline item. Also reachable as [`Deal`].
    pub struct Opportunity / NewOpportunity in opportunities as Opportunity {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [company_id => Company, contact_id => People, owner_id => User],
        morphs: [],
        validate: rules::opportunity,
    }
    {
        pub team_id: i64,
        pub name: String,
        pub company_id: Option<i64>,
        pub contact_id: Option<i64>,
        pub owner_id: Option<i64>,
        pub stage: String,
        pub amount: Option<bigdecimal::BigDecimal>,
        pub currency: String,
        pub probability: Option<i32>,
        pub expected_close_on: Option<jiff_diesel::Date>,
    }
}

pub type Deal = Opportunity;
pub type NewDeal = NewOpportunity;

impl Opportunity {
    pub const COMPANY: BelongsTo<Opportunity, Company> = BelongsTo::new("company_id");
    pub const CONTACT: BelongsTo<Opportunity, People> = BelongsTo::new("contact_id");
    pub const OWNER: BelongsTo<Opportunity, User> = BelongsTo::new("owner_id");
}

entity! {
    pub struct Product / NewProduct in products as Product {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, sku]],
        references: [],
        morphs: [],
        validate: rules::currency_only,
    }
    {
        pub team_id: i64,
        pub name: String,
        pub sku: String,
        pub description: Option<String>,
        pub unit_price: bigdecimal::BigDecimal,
        pub currency: String,
        pub is_active: bool,
    }
}

impl Product {
    pub const ATTRIBUTE_VALUES: HasMany<Product, ProductAttributeValue> =
        HasMany::new("product_id");
}

entity! {
    pub struct ProductAttribute / NewProductAttribute in product_attributes as ProductAttribute {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, name]],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub data_type: String,
    }
}

impl ProductAttribute {
    pub const VALUES: HasMany<ProductAttribute, ProductAttributeValue> =
        HasMany::new("product_attribute_id");
}

entity! {
    pub struct ProductAttributeValue / NewProductAttributeValue
        in product_attribute_values as ProductAttributeValue {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[product_id, product_attribute_id]],
        references: [product_id => Product, product_attribute_id => ProductAttribute],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub product_id: i64,
        pub product_attribute_id: i64,
        pub value: String,
    }
}

impl ProductAttributeValue {
    pub const PRODUCT: BelongsTo<ProductAttributeValue, Product> = BelongsTo::new("product_id");
    pub const ATTRIBUTE: BelongsTo<ProductAttributeValue, ProductAttribute> =
        BelongsTo::new("product_attribute_id");
}

entity! {
    pub struct Order / NewOrder in orders as Order {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, number]],
        references: [company_id => Company, contact_id => People, opportunity_id => Opportunity],
        morphs: [],
        validate: rules::currency_only,
    }
    {
        pub team_id: i64,
        pub number: String,
        pub company_id: Option<i64>,
        pub contact_id: Option<i64>,
        pub opportunity_id: Option<i64>,
        pub status: String,
        pub currency: String,
        pub total: bigdecimal::BigDecimal,
        pub ordered_at: Option<jiff_diesel::Timestamp>,
    }
}

impl Order {
    pub const LINE_ITEMS: HasMany<Order, OrderLineItem> = HasMany::new("order_id");
    pub const DELIVERY: HasOne<Order, Delivery> = HasOne::new("order_id");
    pub const COMPANY: BelongsTo<Order, Company> = BelongsTo::new("company_id");
    pub const CONTACT: BelongsTo<Order, People> = BelongsTo::new("contact_id");
    pub const OPPORTUNITY: BelongsTo<Order, Opportunity> = BelongsTo::new("opportunity_id");
}

entity! {
    /// Also reachable as [`OrderProduct`].
    pub struct OrderLineItem / NewOrderLineItem in order_line_items as OrderLineItem {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [order_id => Order, product_id => Product],
        morphs: [],
        validate: rules::line_item,
    }
    {
        pub team_id: i64,
        pub order_id: i64,
        pub product_id: Option<i64>,
        pub name: String,
        pub quantity: i32,
        pub unit_price: bigdecimal::BigDecimal,
        pub total: bigdecimal::BigDecimal,
    }
}

pub type OrderProduct = OrderLineItem;
pub type NewOrderProduct = NewOrderLineItem;

impl OrderLineItem {
    pub const ORDER: BelongsTo<OrderLineItem, Order> = BelongsTo::new("order_id");
    pub const PRODUCT: BelongsTo<OrderLineItem, Product> = BelongsTo::new("product_id");
}

entity! {
    pub struct Delivery / NewDelivery in deliveries as Delivery {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[order_id]],
        references: [order_id => Order],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub order_id: i64,
        pub status: String,
        pub carrier: Option<String>,
        pub tracking_number: Option<String>,
        pub shipped_at: Option<jiff_diesel::Timestamp>,
        pub delivered_at: Option<jiff_diesel::Timestamp>,
    }
}

impl Delivery {
    pub const ORDER: BelongsTo<Delivery, Order> = BelongsTo::new("order_id");
}

entity! {
    pub struct Invoice / NewInvoice in invoices as Invoice {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, number]],
        references: [company_id => Company, contact_id => People, order_id => Order],
        morphs: [],
        validate: rules::invoice,
    }
    {
        pub team_id: i64,
        pub number: String,
        pub company_id: Option<i64>,
        pub contact_id: Option<i64>,
        pub order_id: Option<i64>,
        pub status: String,
        pub currency: String,
        pub total: bigdecimal::BigDecimal,
        pub issued_on: Option<jiff_diesel::Date>,
        pub due_on: Option<jiff_diesel::Date>,
    }
}

impl Invoice {
    pub const LINE_ITEMS: HasMany<Invoice, InvoiceLineItem> = HasMany::new("invoice_id");
    pub const COMPANY: BelongsTo<Invoice, Company> = BelongsTo::new("company_id");
    pub const ORDER: BelongsTo<Invoice, Order> = BelongsTo::new("order_id");
}

entity! {
    /// Also reachable as [`InvoiceItem`].
    pub struct InvoiceLineItem / NewInvoiceLineItem in invoice_line_items as InvoiceLineItem {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [invoice_id => Invoice, product_id => Product],
        morphs: [],
        validate: rules::line_item,
    }
    {
        pub team_id: i64,
        pub invoice_id: i64,
        pub product_id: Option<i64>,
        pub description: String,
        pub quantity: i32,
        pub unit_price: bigdecimal::BigDecimal,
        pub total: bigdecimal::BigDecimal,
    }
}

pub type InvoiceItem = InvoiceLineItem;
pub type NewInvoiceItem = NewInvoiceLineItem;

impl InvoiceLineItem {
    pub const INVOICE: BelongsTo<InvoiceLineItem, Invoice> = BelongsTo::new("invoice_id");
    pub const PRODUCT: BelongsTo<InvoiceLineItem, Product> = BelongsTo::new("product_id");
}

entity! {
    pub struct Quote / NewQuote in quotes as Quote {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, number]],
        references: [company_id => Company, contact_id => People, opportunity_id => Opportunity],
        morphs: [],
        validate: rules::currency_only,
    }
    {
        pub team_id: i64,
        pub number: String,
        pub company_id: Option<i64>,
        pub contact_id: Option<i64>,
        pub opportunity_id: Option<i64>,
        pub status: String,
        pub currency: String,
        pub total: bigdecimal::BigDecimal,
        pub valid_until: Option<jiff_diesel::Date>,
    }
}

impl Quote {
    pub const LINE_ITEMS: HasMany<Quote, QuoteLineItem> = HasMany::new("quote_id");
    pub const OPPORTUNITY: BelongsTo<Quote, Opportunity> = BelongsTo::new("opportunity_id");
}

entity! {
    /// Also reachable as [`QuoteProduct`].
    pub struct QuoteLineItem / NewQuoteLineItem in quote_line_items as QuoteLineItem {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [quote_id => Quote, product_id => Product],
        morphs: [],
        validate: rules::line_item,
    }
    {
        pub team_id: i64,
        pub quote_id: i64,
        pub product_id: Option<i64>,
        pub name: String,
        pub quantity: i32,
        pub unit_price: bigdecimal::BigDecimal,
        pub discount: bigdecimal::BigDecimal,
        pub total: bigdecimal::BigDecimal,
    }
}

pub type QuoteProduct = QuoteLineItem;
pub type NewQuoteProduct = NewQuoteLineItem;

impl QuoteLineItem {
    pub const QUOTE: BelongsTo<QuoteLineItem, Quote> = BelongsTo::new("quote_id");
    pub const PRODUCT: BelongsTo<QuoteLineItem, Product> = BelongsTo::new("product_id");
}

entity! {
    pub struct PurchaseOrder / NewPurchaseOrder in purchase_orders as PurchaseOrder {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, number]],
        references: [supplier_company_id => Company],
        morphs: [],
        validate: rules::currency_only,
    }
    {
        pub team_id: i64,
        pub number: String,
        pub supplier_company_id: Option<i64>,
        pub status: String,
        pub currency: String,
        pub total: bigdecimal::BigDecimal,
        pub ordered_at: Option<jiff_diesel::Timestamp>,
        pub expected_on: Option<jiff_diesel::Date>,
    }
}

impl PurchaseOrder {
    pub const ITEMS: HasMany<PurchaseOrder, PurchaseOrderItem> = HasMany::new("purchase_order_id");
    pub const SUPPLIER: BelongsTo<PurchaseOrder, Company> = BelongsTo::new("supplier_company_id");
}

entity! {
    pub struct PurchaseOrderItem / NewPurchaseOrderItem
        in purchase_order_items as PurchaseOrderItem {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [purchase_order_id => PurchaseOrder, product_id => Product],
        morphs: [],
        validate: rules::line_item,
    }
    {
        pub team_id: i64,
        pub purchase_order_id: i64,
        pub product_id: i64,
        pub quantity: i32,
        pub unit_cost: bigdecimal::BigDecimal,
        pub total: bigdecimal::BigDecimal,
    }
}

impl PurchaseOrderItem {
    pub const PURCHASE_ORDER: BelongsTo<PurchaseOrderItem, PurchaseOrder> =
        BelongsTo::new("purchase_order_id");
    pub const PRODUCT: BelongsTo<PurchaseOrderItem, Product> = BelongsTo::new("product_id");
}
