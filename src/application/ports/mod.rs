//! Outbound ports: interfaces to external collaborators

pub mod mobile_money;

pub use mobile_money::{
    CheckoutHandle, CheckoutStatus, MobileMoneyProvider, ProviderError, QrHandle, SimBehavior,
    SimulatedMobileMoney,
};
