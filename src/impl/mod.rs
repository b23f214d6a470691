// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod deep_link_datasource;
        pub(crate) mod ledger_api_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod customer_model;
        pub(crate) mod invoice_model;
        pub(crate) mod ledger_amount_model;
        pub(crate) mod ledger_date_model;
        pub(crate) mod ledger_envelope_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod ledger_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod customer;
        pub(crate) mod date_window;
        pub(crate) mod dispatch;
        pub(crate) mod reconciled_customer;
    }
    pub(crate) mod logic {
        pub(crate) mod debt_filter;
        pub(crate) mod dispatcher;
        pub(crate) mod invoice_loading;
        pub(crate) mod pacing;
        pub(crate) mod phone;
        pub(crate) mod selection;
    }
    pub(crate) mod repositories {
        pub(crate) mod ledger_repository;
        pub(crate) mod notification_sink;
    }
    pub(crate) mod usecases {
        pub(crate) mod dispatch_usecase;
        pub(crate) mod reconcile_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod currency_fmt;
    pub(crate) mod message_fmt;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::customer::*;
        pub use crate::domain::entities::date_window::*;
        pub use crate::domain::entities::dispatch::*;
        pub use crate::domain::entities::reconciled_customer::*;
    }

    /// Seams for plugging in other ledgers and channels.
    pub mod repositories {
        pub use crate::domain::repositories::ledger_repository::*;
        pub use crate::domain::repositories::notification_sink::*;
    }

    pub mod logic {
        pub use crate::domain::logic::dispatcher::{CancelHandle, Dispatcher};
        pub use crate::domain::logic::invoice_loading::{
            EagerBatchLoading, InvoiceLoading, InvoiceLoadingStrategy, LazyCachedLoading,
        };
        pub use crate::domain::logic::pacing::*;
        pub use crate::domain::logic::phone::*;
        pub use crate::domain::logic::selection::*;
    }

    pub mod usecases {
        pub use crate::domain::usecases::reconcile_usecase::ReconcileUsecase;
    }

    pub mod ledger {
        pub use crate::data::repositories::ledger_repository_impl::LedgerRepositoryImpl;
    }

    pub mod channels {
        pub use crate::data::datasources::deep_link_datasource::*;
    }

    pub mod message {
        pub use crate::presentation::message_fmt::*;
    }
}
