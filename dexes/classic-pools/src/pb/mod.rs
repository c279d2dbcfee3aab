pub mod classic {
    pub mod types {
        pub mod v1 {
            include!("../generated/classic.types.v1.rs");
        }
    }
}
