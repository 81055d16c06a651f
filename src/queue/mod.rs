pub mod payment_queue;
