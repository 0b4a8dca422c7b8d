pub mod order_flow;
pub mod reference;
