pub mod charge;
pub mod customer;
pub mod device;
pub mod inventory_item;
pub mod inventory_usage;
pub mod payment;
pub mod repair;
pub mod staff;
pub mod token_counter;
