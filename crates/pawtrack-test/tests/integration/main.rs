mod calendar;
mod helpers;
mod http_api;
mod recurrence_chain;
