mod connection_flow;
mod dispatcher;
mod helpers;
mod selection;
mod text_model;
mod wrap_properties;
