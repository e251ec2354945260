//! 데모 데이터 정의.
//!
//! 시각은 모두 시드 실행 시점 기준 상대값(초)입니다.

use leadflow_core::{AccountStatus, CallStatus, Direction, LeadSource, LeadStatus, Role};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const ADMIN_PASSWORD: &str = "admin123";
pub const USER_PASSWORD: &str = "user123";

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

pub struct SeedAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub status: AccountStatus,
    /// 마지막 로그인 (몇 초 전). `None`이면 로그인 이력 없음.
    pub last_login_ago: Option<i64>,
}

pub struct SeedLead {
    pub name: &'static str,
    pub phone: &'static str,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: &'static str,
    pub ago: i64,
}

impl SeedLead {
    /// 이름에서 만든 데모 이메일 (`rahul.sharma@email.com`).
    pub fn email(&self) -> String {
        format!("{}@email.com", self.name.to_lowercase().replace(' ', "."))
    }
}

pub struct SeedMessage {
    pub phone: &'static str,
    pub message: &'static str,
    pub direction: Direction,
    pub read: bool,
    pub ago: i64,
}

pub struct SeedCall {
    pub phone: &'static str,
    pub direction: Direction,
    pub duration: i32,
    pub cost: Decimal,
    pub status: CallStatus,
    pub notes: &'static str,
    pub ago: i64,
}

pub fn accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            name: "Admin User",
            email: "admin@leadflow.com",
            password: ADMIN_PASSWORD,
            role: Role::SuperAdmin,
            status: AccountStatus::Active,
            last_login_ago: Some(0),
        },
        SeedAccount {
            name: "Test User",
            email: "user@leadflow.com",
            password: USER_PASSWORD,
            role: Role::AuthorizedUser,
            status: AccountStatus::Active,
            last_login_ago: Some(0),
        },
        SeedAccount {
            name: "Pending User",
            email: "pending@leadflow.com",
            password: USER_PASSWORD,
            role: Role::PendingUser,
            status: AccountStatus::Pending,
            last_login_ago: None,
        },
        SeedAccount {
            name: "Sales Manager",
            email: "sales@leadflow.com",
            password: USER_PASSWORD,
            role: Role::AuthorizedUser,
            status: AccountStatus::Active,
            last_login_ago: Some(DAY),
        },
    ]
}

pub fn leads() -> Vec<SeedLead> {
    use LeadSource::{Call, Whatsapp};
    use LeadStatus::{Cold, Hot, Warm};

    fn lead(
        name: &'static str,
        phone: &'static str,
        source: LeadSource,
        status: LeadStatus,
        notes: &'static str,
        ago: i64,
    ) -> SeedLead {
        SeedLead {
            name,
            phone,
            source,
            status,
            notes,
            ago,
        }
    }

    vec![
        lead("Rahul Sharma", "917060175427", Call, Hot,
            "Interested in South Delhi property. Budget 50 lakhs. Site visit scheduled.", 0),
        lead("Priya Patel", "918765432109", Call, Hot,
            "Looking for commercial space in Gurgaon Cyber City. Budget 2.5 crores.", HOUR),
        lead("Amit Kumar", "919876543210", Whatsapp, Warm,
            "Inquiring about residential plots in Noida Expressway. Budget 1.5 crores.", 2 * HOUR),
        lead("Sneha Verma", "919001234567", Call, Warm,
            "Interested in luxury apartment in DLF Phase 5. Budget up to 4 crores.", 3 * HOUR),
        lead("Vikram Singh", "919876123456", Whatsapp, Cold,
            "Looking for investment property in Faridabad. Budget 60-70 lakhs.", DAY),
        lead("Neha Gupta", "917890123456", Call, Hot,
            "First-time home buyer. 2BHK in Indirapuram. Budget 85 lakhs.", 2 * DAY),
        lead("Rajesh Malhotra", "919234567890", Whatsapp, Warm,
            "NRI client looking for penthouse in Dwarka. Budget 6 crores.", 3 * DAY),
        lead("Deepak Joshi", "918345678901", Call, Warm,
            "Looking for warehouse in Bhiwandi, Mumbai. Budget 2 crores.", 4 * DAY),
        lead("Kavita Mehta", "917890234567", Whatsapp, Cold,
            "Inquiring about retirement home in Dehradun. Budget 1.5 crores.", 5 * DAY),
        lead("Sanjay Kapoor", "919567890123", Call, Warm,
            "Investor looking for retail space in Connaught Place. Budget 3 crores.", 6 * DAY),
        lead("Anita Desai", "918901234567", Whatsapp, Hot,
            "Looking for 1BHK for daughter. Vaishali. Budget 45-50 lakhs.", 7 * DAY),
        lead("Mahesh Reddy", "919012345678", Call, Warm,
            "Looking for warehouse in Bhiwandi. 5000 sq ft. Budget 2.5 crores.", 8 * DAY),
    ]
}

pub fn messages() -> Vec<SeedMessage> {
    use Direction::{Incoming, Outgoing};

    fn msg(
        phone: &'static str,
        message: &'static str,
        direction: Direction,
        read: bool,
        ago: i64,
    ) -> SeedMessage {
        SeedMessage {
            phone,
            message,
            direction,
            read,
            ago,
        }
    }

    vec![
        msg("917060175427", "Hi, I am interested in the property", Incoming, true, 3_600),
        msg("917060175427", "Hello! Thank you for your interest. Which property are you looking at?", Outgoing, true, 3_500),
        msg("917060175427", "The one in South Delhi, 5BHK", Incoming, true, 3_400),
        msg("917060175427", "Great! The South Delhi property has 3 BHK available. Would you like to schedule a site visit?", Outgoing, true, 3_300),
        msg("917060175427", "Yes, tomorrow at 2 PM works for me", Incoming, false, 3_200),
        msg("918765432109", "Hello, I want to see commercial space in Gurgaon", Incoming, true, 7_200),
        msg("918765432109", "Hi Priya! We have excellent commercial spaces in Cyber City. What are your requirements?", Outgoing, true, 7_100),
        msg("918765432109", "Need 500 sq ft, budget around 2.5 crores", Incoming, false, 7_000),
        msg("919876543210", "Hi, looking for plots in Noida", Incoming, true, 10_800),
        msg("919876543210", "Hello Amit! We have plots available on Noida Expressway. Size preference?", Outgoing, true, 10_700),
        msg("919876543210", "300 sq yards, budget 1.5 crores", Incoming, true, 10_600),
        msg("919876543210", "Great! 300 sq yards plots are available. I will share the details and price list.", Outgoing, true, 10_500),
        msg("919001234567", "Show me luxury apartments in DLF Phase 5", Incoming, true, 14_400),
        msg("919001234567", "Hi Sneha! We have premium 4 BHK apartments with servant rooms. Budget?", Outgoing, true, 14_300),
        msg("919001234567", "Budget up to 4 crores", Incoming, false, 14_200),
        msg("919876123456", "Investment properties in Faridabad", Incoming, true, 18_000),
        msg("919876123456", "Hello! We have several investment options in Faridabad. What is your budget?", Outgoing, true, 17_900),
        msg("917890123456", "I am a first time buyer, looking for 2BHK", Incoming, true, 21_600),
        msg("917890123456", "Congratulations on your first home! Where would you like to buy?", Outgoing, true, 21_500),
        msg("917890123456", "Indirapuram, near metro. Also need loan assistance", Incoming, false, 21_400),
    ]
}

pub fn calls() -> Vec<SeedCall> {
    use CallStatus::{Completed, Missed};
    use Direction::{Incoming, Outgoing};

    fn call(
        phone: &'static str,
        direction: Direction,
        duration: i32,
        cost: Decimal,
        status: CallStatus,
        notes: &'static str,
        ago: i64,
    ) -> SeedCall {
        SeedCall {
            phone,
            direction,
            duration,
            cost,
            status,
            notes,
            ago,
        }
    }

    vec![
        call("917060175427", Incoming, 195, dec!(0.41), Completed,
            "Interested in South Delhi property. Site visit scheduled for tomorrow at 2 PM.", 0),
        call("918765432109", Incoming, 330, dec!(0.62), Completed,
            "Commercial space in Cyber City, 500 sq ft. Payment plans discussed.", HOUR),
        call("919876543210", Incoming, 252, dec!(0.51), Completed,
            "Residential plots on Noida Expressway. Will call back next week.", 2 * HOUR),
        call("919001234567", Incoming, 366, dec!(0.79), Completed,
            "4 BHK in DLF Phase 5. Needs to discuss with spouse.", 3 * HOUR),
        call("919876123456", Incoming, 210, dec!(0.45), Completed,
            "2 BHK under construction in Faridabad. Considering options.", DAY),
        call("917890123456", Incoming, 300, dec!(0.68), Completed,
            "Loan eligibility and EMI options discussed. Advisor meeting next week.", 2 * DAY),
        call("919234567890", Incoming, 432, dec!(0.86), Completed,
            "NRI client, penthouse in Dwarka. Wants virtual tour.", 3 * DAY),
        call("918345678901", Outgoing, 288, dec!(0.57), Completed,
            "Commercial showroom in Greater Noida. Will send location analysis.", 4 * DAY),
        call("917890234567", Incoming, 180, dec!(0.42), Completed,
            "Retirement home in Dehradun. Site visit next month.", 5 * DAY),
        call("919567890123", Outgoing, 0, dec!(0), Missed,
            "No answer. Retry in the evening.", 6 * DAY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_account_mix_covers_every_role() {
        let accounts = accounts();

        let supers = accounts.iter().filter(|a| a.role == Role::SuperAdmin).count();
        let pending = accounts
            .iter()
            .filter(|a| a.status == AccountStatus::Pending)
            .count();

        assert_eq!(supers, 1);
        assert_eq!(pending, 1);
        assert!(accounts.iter().all(|a| a.email == a.email.to_lowercase()));
        assert!(accounts.iter().all(|a| a.password.len() >= 6));
    }

    #[test]
    fn test_lead_phones_are_unique() {
        let leads = leads();
        let phones: HashSet<_> = leads.iter().map(|l| l.phone).collect();
        assert_eq!(phones.len(), leads.len());
    }

    #[test]
    fn test_messages_and_calls_belong_to_seeded_leads() {
        let phones: HashSet<_> = leads().iter().map(|l| l.phone).collect();

        assert!(messages().iter().all(|m| phones.contains(m.phone)));
        assert!(calls().iter().all(|c| phones.contains(c.phone)));
    }

    #[test]
    fn test_some_incoming_messages_left_unread() {
        let unread = messages()
            .iter()
            .filter(|m| !m.read)
            .map(|m| m.direction)
            .collect::<Vec<_>>();

        assert!(!unread.is_empty());
        assert!(unread.iter().all(|d| *d == Direction::Incoming));
    }

    #[test]
    fn test_lead_email_from_name() {
        let lead = &leads()[0];
        assert_eq!(lead.email(), "rahul.sharma@email.com");
    }
}
