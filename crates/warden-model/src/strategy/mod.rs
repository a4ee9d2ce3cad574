mod reconcile;
pub use reconcile::ReconcilePolicy;
