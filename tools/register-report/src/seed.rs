//! Demo register used when no snapshot exists yet.

use register_types::asset::{Asset, AssetCategory, CidRatings};
use register_types::catalog::{Control, ControlType, Threat, ThreatCategory, Vulnerability, VulnerabilityCategory};
use register_types::errors::RegisterError;
use register_types::scenario::{RiskScenario, TreatmentPlan, TreatmentStatus, TreatmentStrategy};
use risk_engine::register::Register;

/// Two assets, two threats, two vulnerabilities, three controls and two
/// scenarios under a Mitigate plan.
pub fn seed_register(timestamp: i64) -> Result<Register, RegisterError> {
    let mut register = Register::new();

    let customer_db = register.add_asset(
        Asset::new("Customer database", AssetCategory::Data, timestamp)
            .with_ratings(CidRatings::new(3, 3, 2))
            .with_owner(Some("Sales"), Some("IT"))
            .with_description("Holds personal and billing data"),
        timestamp,
    )?;
    let web_server = register.add_asset(
        Asset::new("Public web server", AssetCategory::Service, timestamp)
            .with_ratings(CidRatings::new(2, 2, 3))
            .with_owner(Some("Marketing"), Some("IT"))
            .with_description("Corporate web portal exposed to the Internet"),
        timestamp,
    )?;

    let unauthorized_access = register.add_threat(
        Threat::new("Unauthorized access", ThreatCategory::External)
            .with_description("Brute-force attacks, stolen credentials"),
        timestamp,
    )?;
    let sql_injection = register.add_threat(
        Threat::new("SQL injection", ThreatCategory::External)
            .with_description("Exploitation of non-parameterized queries"),
        timestamp,
    )?;

    let weak_passwords = register.add_vulnerability(
        Vulnerability::new("Weak passwords", VulnerabilityCategory::Organizational)
            .with_description("Password policy not enforced"),
        timestamp,
    )?;
    let missing_validation = register.add_vulnerability(
        Vulnerability::new("Missing input validation", VulnerabilityCategory::Technological)
            .with_description("Unsanitized fields"),
        timestamp,
    )?;

    let mfa = register.add_control(
        Control::new("Multi-factor authentication")
            .with_reference("ISO 27002:2022 - Access management")
            .with_type(ControlType::Preventive)
            .with_description("MFA for privileged accounts"),
        timestamp,
    )?;
    let sanitization = register.add_control(
        Control::new("Input validation and sanitization")
            .with_reference("ISO 27002:2022 - Secure development")
            .with_type(ControlType::Preventive)
            .with_description("Validate inputs and use parameterized queries"),
        timestamp,
    )?;
    register.add_control(
        Control::new("Tested backups and restore")
            .with_reference("ISO 27002:2022 - Backup")
            .with_type(ControlType::Corrective)
            .with_description("Copies with recovery drills"),
        timestamp,
    )?;

    let access_risk = register.create_scenario(
        RiskScenario::new(customer_db, unauthorized_access, weak_passwords, 4, timestamp)
            .with_notes(Some("Basic access control"), Some("Harden controls and train staff.")),
        timestamp,
    )?;
    register.set_treatment(
        &access_risk,
        TreatmentPlan::new(TreatmentStatus::InProgress)
            .with_strategy(TreatmentStrategy::Mitigate)
            .with_controls([mfa])
            .with_responsible("Security analyst"),
        timestamp,
    )?;

    let injection_risk = register.create_scenario(
        RiskScenario::new(web_server, sql_injection, missing_validation, 5, timestamp)
            .with_notes(Some("Basic WAF"), Some("Fix the code and monitor.")),
        timestamp,
    )?;
    register.set_treatment(
        &injection_risk,
        TreatmentPlan::new(TreatmentStatus::Pending)
            .with_strategy(TreatmentStrategy::Mitigate)
            .with_controls([sanitization])
            .with_responsible("DevOps"),
        timestamp,
    )?;

    Ok(register)
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::engine::RiskEngine;

    const TS: i64 = 1708123456789000000;

    #[test]
    fn test_seed_counts() {
        let register = seed_register(TS).unwrap();
        assert_eq!(register.assets().count(), 2);
        assert_eq!(register.controls().count(), 3);
        assert_eq!(register.scenarios().len(), 2);
    }

    #[test]
    fn test_seed_dashboard() {
        let register = seed_register(TS).unwrap();
        let dashboard = RiskEngine::new().dashboard(&register).unwrap();

        // 3+3+2 = 8 → 5, × 4 = 20; 2+2+3 = 7 → 3, × 5 = 15
        let scores: Vec<u8> = dashboard.top_risks.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![20, 15]);
        // Neither plan has a due date yet
        assert_eq!(dashboard.kpis[1].value, "0%");
        assert_eq!(dashboard.kpis[0].value, "2");
    }
}
