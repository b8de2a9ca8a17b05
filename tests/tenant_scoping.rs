//! Database-backed checks. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use bigdecimal::BigDecimal;
use crm_auth::config::Settings;
use crm_auth::db::{establish_async_connection_pool, run_pending_migrations};
use crm_auth::error::AppError;
use crm_auth::models::{
    AccountFilter, ClientFilter, NewBranch, NewClient, NewCompany, UpdateBranch, UpdateClient,
};
use crm_auth::repositories::Repositories;
use crm_auth::services::{
    ADMIN_ROLE, AccountChanges, AccountDraft, LOGIN_FAILED_MESSAGE, Services, TenantBootstrap,
};
use uuid::Uuid;

async fn services() -> Services {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");

    let mut settings = Settings::default();
    settings.database.url = url.clone();
    settings.jwt.access_secret = "access-secret-for-integration-tests-0123456789".to_string();
    settings.jwt.refresh_secret = "refresh-secret-for-integration-tests-0123456789".to_string();

    run_pending_migrations(url).await.unwrap();
    let pool = establish_async_connection_pool(&settings.database).await.unwrap();
    Services::new(Repositories::new(pool), &settings)
}

fn unique_phone() -> String {
    format!("+{}", Uuid::new_v4().as_u128() % 10_000_000_000_000)
}

fn tenant(company: &str, phone: &str, password: &str) -> TenantBootstrap {
    TenantBootstrap {
        company_name: company.to_string(),
        website: None,
        logo: None,
        first_name: "Jo".to_string(),
        last_name: "Doe".to_string(),
        email: None,
        phone_number: phone.to_string(),
        password: password.to_string(),
        role: ADMIN_ROLE.to_string(),
    }
}

fn draft(role: &str) -> AccountDraft {
    AccountDraft {
        first_name: "Sam".to_string(),
        last_name: "Roe".to_string(),
        email: None,
        phone_number: unique_phone(),
        password: "pw".to_string(),
        role: role.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn bootstrap_then_login_yields_tenant_token() {
    let services = services().await;
    let phone = unique_phone();

    let (company, account) = services
        .auth
        .bootstrap_tenant(tenant("Acme", &phone, "pw"))
        .await
        .unwrap();
    assert_eq!(account.role, "admin");
    assert_eq!(account.company_id, company.id);

    let tokens = services.auth.login(&phone, "pw".to_string()).await.unwrap();
    let claims = services.auth.authenticate(&tokens.access_token).unwrap();
    assert_eq!(claims.tenant_id, company.id);
    assert_eq!(claims.sub, account.id);
    assert_eq!(claims.first_name, "Jo");
    assert_eq!(claims.phone_number, phone);
    assert_eq!(claims.role, "admin");

    let refreshed = services.auth.refresh(&tokens.refresh_token).await.unwrap();
    assert!(services.auth.authenticate(&refreshed.access_token).is_ok());

    for (phone, password) in [(phone.as_str(), "wrong"), ("+0", "pw")] {
        match services.auth.login(phone, password.to_string()).await {
            Err(AppError::Unauthorized { message }) => assert_eq!(message, LOGIN_FAILED_MESSAGE),
            other => panic!("expected login failure, got {:?}", other.map(|_| ())),
        }
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_phone_rolls_back_company() {
    let services = services().await;
    let phone = unique_phone();
    let company_name = format!("Rollback {}", Uuid::new_v4());

    services
        .auth
        .bootstrap_tenant(tenant("First", &phone, "pw"))
        .await
        .unwrap();

    let result = services
        .auth
        .bootstrap_tenant(tenant(&company_name, &phone, "pw"))
        .await;
    assert!(matches!(result, Err(AppError::Duplicate { .. })));

    let companies = services
        .companies
        .list(
            "superadmin",
            crm_auth::models::CompanyFilter {
                name: Some(company_name),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(companies.total, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn other_tenant_cannot_touch_records() {
    let services = services().await;
    let (tenant_a, _) = services
        .auth
        .bootstrap_tenant(tenant("Tenant A", &unique_phone(), "pw"))
        .await
        .unwrap();
    let (tenant_b, account_b) = services
        .auth
        .bootstrap_tenant(tenant("Tenant B", &unique_phone(), "pw"))
        .await
        .unwrap();

    let client = services
        .clients
        .create(NewClient {
            company_id: tenant_a.id,
            full_name: "Ada Client".to_string(),
            address: "1 Main St".to_string(),
            phone: "+2000".to_string(),
            kind: "person".to_string(),
            client_type: "regular".to_string(),
        })
        .await
        .unwrap();
    let branch = services
        .branches
        .create(NewBranch {
            company_id: tenant_a.id,
            name: "HQ".to_string(),
            address: "1 Main St".to_string(),
            phone_number: "+3000".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(
        services.clients.get(tenant_b.id, client.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        services
            .clients
            .update(
                tenant_b.id,
                client.id,
                UpdateClient {
                    full_name: Some("Hijacked".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        services.clients.delete(tenant_b.id, client.id).await,
        Err(AppError::NotFound { .. })
    ));
    let listed = services
        .clients
        .list(tenant_b.id, ClientFilter::default())
        .await
        .unwrap();
    assert!(listed.items.iter().all(|c| c.id != client.id));

    assert!(matches!(
        services
            .branches
            .update(
                tenant_b.id,
                branch.id,
                UpdateBranch {
                    name: Some("Hijacked".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        services.branches.delete(tenant_b.id, branch.id).await,
        Err(AppError::NotFound { .. })
    ));

    assert!(matches!(
        services.accounts.get(tenant_a.id, account_b.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        services
            .accounts
            .update(
                tenant_a.id,
                ADMIN_ROLE,
                account_b.id,
                AccountChanges {
                    role: Some("admin".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::NotFound { .. })
    ));

    let unchanged = services.clients.get(tenant_a.id, client.id).await.unwrap();
    assert_eq!(unchanged.full_name, "Ada Client");
    assert_eq!(
        services.branches.get(tenant_a.id, branch.id).await.unwrap().name,
        "HQ"
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn low_balance_declines_sms() {
    let services = services().await;
    let (company, _) = services
        .auth
        .bootstrap_tenant(tenant("Low Balance", &unique_phone(), "pw"))
        .await
        .unwrap();

    services
        .balances
        .create(company.id, BigDecimal::from(150))
        .await
        .unwrap();

    let outcome = services
        .notifications
        .send_sms(company.id, "+4000".to_string(), "hello".to_string())
        .await
        .unwrap();
    assert!(!outcome.sent);
    assert_eq!(outcome.message, "Not enough balance");

    services.balances.delete(company.id).await.unwrap();
    assert!(matches!(
        services.balances.get(company.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn partial_update_keeps_other_fields() {
    let services = services().await;
    let (company, _) = services
        .auth
        .bootstrap_tenant(tenant("Partial", &unique_phone(), "pw"))
        .await
        .unwrap();

    let client = services
        .clients
        .create(NewClient {
            company_id: company.id,
            full_name: "Ada Client".to_string(),
            address: "1 Main St".to_string(),
            phone: "+2000".to_string(),
            kind: "person".to_string(),
            client_type: "regular".to_string(),
        })
        .await
        .unwrap();

    let updated = services
        .clients
        .update(
            company.id,
            client.id,
            UpdateClient {
                full_name: Some("Ada Lovelace".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Ada Lovelace");
    assert_eq!(updated.address, client.address);
    assert_eq!(updated.phone, client.phone);
    assert_eq!(updated.kind, client.kind);
    assert_eq!(updated.client_type, client.client_type);

    let reread = services.clients.get(company.id, client.id).await.unwrap();
    assert_eq!(reread.full_name, "Ada Lovelace");
    assert_eq!(reread.address, "1 Main St");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn second_delete_is_not_found() {
    let services = services().await;
    let (company, _) = services
        .auth
        .bootstrap_tenant(tenant("Twice", &unique_phone(), "pw"))
        .await
        .unwrap();

    let branch = services
        .branches
        .create(NewBranch {
            company_id: company.id,
            name: "HQ".to_string(),
            address: "1 Main St".to_string(),
            phone_number: "+3000".to_string(),
        })
        .await
        .unwrap();
    services.branches.delete(company.id, branch.id).await.unwrap();
    assert!(matches!(
        services.branches.delete(company.id, branch.id).await,
        Err(AppError::NotFound { .. })
    ));

    services
        .balances
        .create(company.id, BigDecimal::from(500))
        .await
        .unwrap();
    services.balances.delete(company.id).await.unwrap();
    assert!(matches!(
        services.balances.delete(company.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn account_needs_live_company() {
    let services = services().await;

    let company = services
        .companies
        .create(
            "superadmin",
            NewCompany {
                name: format!("Closing {}", Uuid::new_v4()),
                website: None,
                logo: None,
            },
        )
        .await
        .unwrap();
    services
        .companies
        .delete(company.id, "superadmin", company.id)
        .await
        .unwrap();

    assert!(matches!(
        services
            .accounts
            .create(company.id, "superadmin", draft("manager"))
            .await,
        Err(AppError::NotFound { entity, .. }) if entity == "company"
    ));
    let listed = services
        .accounts
        .list(company.id, AccountFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 0);

    assert!(matches!(
        services
            .accounts
            .create(Uuid::new_v4(), "superadmin", draft("manager"))
            .await,
        Err(AppError::NotFound { entity, .. }) if entity == "company"
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn self_registered_admin_cannot_promote_itself() {
    let services = services().await;
    let (company, admin) = services
        .auth
        .bootstrap_tenant(tenant("Climber", &unique_phone(), "pw"))
        .await
        .unwrap();

    assert!(matches!(
        services
            .accounts
            .update(
                company.id,
                &admin.role,
                admin.id,
                AccountChanges {
                    role: Some("superadmin".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(AppError::Forbidden { .. })
    ));
    assert_eq!(
        services.accounts.get(company.id, admin.id).await.unwrap().role,
        ADMIN_ROLE
    );
}
