pub mod currency;
pub mod logs;
pub mod metals;
pub mod mutual_fund;
pub mod rates;
pub mod savings;
pub mod setup;
pub mod ui;
