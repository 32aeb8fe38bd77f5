pub mod admin;
pub mod auth;
pub mod chat;
pub mod gigs;
pub mod notifications;
pub mod payments;
pub mod proposals;
pub mod reviews;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth / profile routes ──
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/me", web::get().to(auth::me)),
    );
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(users::get_own_profile))
            .route(web::put().to(users::update_own_profile)),
    );
    cfg.service(
        web::resource("/profile/{id}").route(web::get().to(users::get_public_profile)),
    );

    // ── Gig routes (browse and detail are public; the rest require a JWT) ──
    cfg.service(
        web::scope("/gigs")
            .route("", web::post().to(gigs::create_gig))
            .route("/all", web::get().to(gigs::browse_gigs))
            .route("/mygigs", web::get().to(gigs::my_gigs))
            .route("/applied", web::get().to(proposals::applied_gigs))
            .route("/hired-freelancers", web::get().to(gigs::hired_freelancers))
            .route("/client/stats", web::get().to(gigs::client_stats))
            .route("/freelancer/stats", web::get().to(gigs::freelancer_stats))
            .route(
                "/proposals/check/{gig_id}",
                web::get().to(proposals::check_applied),
            )
            .route(
                "/freelancer/{id}/reviews",
                web::get().to(reviews::freelancer_reviews),
            )
            .route("/{id}", web::get().to(gigs::get_gig))
            .route("/{id}", web::delete().to(gigs::delete_gig))
            .route("/{id}/proposals", web::post().to(proposals::submit_proposal))
            .route("/{id}/proposals", web::get().to(proposals::proposals_for_gig))
            .route(
                "/{gig_id}/proposals/{proposal_id}/accept",
                web::put().to(proposals::accept_proposal),
            )
            .route(
                "/{gig_id}/proposals/{proposal_id}/reject",
                web::put().to(proposals::reject_proposal),
            )
            .route("/{id}/complete", web::put().to(gigs::complete_gig))
            .route(
                "/{id}/checkout-details",
                web::get().to(gigs::checkout_details),
            )
            .route("/{id}/review", web::post().to(reviews::submit_review)),
    );

    // ── Payment routes ──
    cfg.service(
        web::scope("/payment")
            .route("/order", web::post().to(payments::create_order))
            .route("/verify", web::post().to(payments::verify_payment)),
    );

    // ── Notification routes ──
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications))
            .route("/{id}/read", web::put().to(notifications::mark_read)),
    );

    // ── Admin routes ──
    cfg.service(
        web::scope("/admin")
            .route("/stats", web::get().to(admin::platform_stats))
            .route("/payouts", web::get().to(admin::pending_payouts))
            .route("/payouts/{id}", web::put().to(admin::process_payout))
            .route("/users", web::get().to(admin::all_users))
            .route("/users/{id}", web::delete().to(admin::delete_user))
            .route("/gigs", web::get().to(admin::all_gigs))
            .route("/gigs/{id}", web::delete().to(admin::delete_gig)),
    );

    // ── Chat routes ──
    cfg.service(
        web::scope("/chat")
            .route("/ws", web::get().to(crate::chat::session::ws_connect))
            .route("/{gig_id}/messages", web::get().to(chat::get_messages)),
    );
}
