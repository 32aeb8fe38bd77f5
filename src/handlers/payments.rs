use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::chat::server::ChatServer;
use crate::db::gigs as gig_db;
use crate::db::proposals as proposal_db;
use crate::error::ApiError;
use crate::models::gigs::GigStatus;
use crate::models::notifications::NotificationKind;
use crate::notify;
use crate::payment::gateway::PaymentGateway;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub gig_id: Uuid,
}

/// POST /api/payment/order — the gig owner opens checkout for a completed
/// gig. The charged amount is the accepted proposal's bid, converted to the
/// currency's minor unit for the gateway.
pub async fn create_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    gateway: web::Data<PaymentGateway>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = body.gig_id;

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to pay for this gig.".into(),
        ));
    }
    if gig.status != GigStatus::Completed {
        return Err(ApiError::Conflict(
            "Gig must be completed before payment.".into(),
        ));
    }

    let proposal = proposal_db::get_accepted_for_gig(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Gig has no accepted proposal.".into()))?;

    let amount = (proposal.bid_amount * 100.0).round() as u64;
    let receipt = format!("gig_{gig_id}");

    let order = gateway.create_order(amount, "INR", &receipt).await?;

    Ok(HttpResponse::Ok().json(order))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gig_id: Uuid,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// POST /api/payment/verify — the client's browser reports a completed
/// checkout. The gateway's HMAC signature is checked first; only then does
/// the gig move `completed → paid`, in one conditional update so a replayed
/// confirmation cannot fire twice.
pub async fn verify_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    gateway: web::Data<PaymentGateway>,
    hub: web::Data<Arc<ChatServer>>,
    body: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), input.gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {} not found", input.gig_id)))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to verify payment for this gig.".into(),
        ));
    }

    if !gateway.verify_signature(&input.order_id, &input.payment_id, &input.signature) {
        return Err(ApiError::Validation(
            "Payment signature verification failed.".into(),
        ));
    }

    if !gig_db::transition_paid(db.get_ref(), gig.id).await? {
        return Err(ApiError::Conflict(
            "Gig is not awaiting payment; it may already be paid.".into(),
        ));
    }

    tracing::info!(gig_id = %gig.id, order_id = %input.order_id, "payment verified");

    if let Some(freelancer_id) = gig.hired_freelancer {
        let amount = gig.final_amount.unwrap_or(gig.budget);
        notify::raise(
            db.get_ref(),
            hub.get_ref().as_ref(),
            freelancer_id,
            NotificationKind::Payment,
            format!("Payment of {amount} received for \"{}\".", gig.title),
            Some((user.0.id, &user.0.username)),
        )
        .await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payment successful!",
    })))
}
