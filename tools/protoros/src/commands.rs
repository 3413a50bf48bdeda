pub mod msg2proto;
pub mod proto2msg;
