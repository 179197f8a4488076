//! Built-in wizard definitions for patients and doctors.

use super::registry::{FieldSpec, Role, Rule, Step, WizardDefinition};
use crate::error::ConfigError;

const GENDERS: &[&str] = &["Male", "Female", "Other"];
const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];
const CONSULT_TYPES: &[&str] = &["Video", "In-Person", "Chat"];
const PAYMENT_METHODS: &[&str] = &["Card", "Bank Transfer", "Wallet"];
const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const YES_NO: &[&str] = &["Yes", "No"];
const PAYOUT_FREQUENCIES: &[&str] = &["Weekly", "Monthly"];
const NOTIFICATION_CHANNELS: &[&str] = &["SMS", "Email", "App"];

const IMAGE_OR_PDF: &str = "image/*,application/pdf";
const IMAGE: &str = "image/*";
const VIDEO: &str = "video/*";

pub const PATIENT_ENDPOINT: &str = "/api/patients/onboarding";
pub const DOCTOR_ENDPOINT: &str = "/api/doctors/onboarding";

pub fn patient() -> Result<WizardDefinition, ConfigError> {
    let steps = vec![
        Step::new("Personal Info", "Basic Personal Information")
            .field(FieldSpec::text("firstName", "First Name").required())
            .field(FieldSpec::text("middleName", "Middle Name"))
            .field(FieldSpec::text("lastName", "Last Name").required())
            .field(FieldSpec::select("gender", "Gender", GENDERS).required())
            .field(FieldSpec::date("dob", "Date of Birth").required())
            .field(FieldSpec::text("phone", "Phone Number").required())
            .field(FieldSpec::text("email", "Email Address").required())
            .field(FieldSpec::text("address", "Residential Address").required())
            .field(FieldSpec::text("nationality", "Nationality").required())
            .field(FieldSpec::text("stateOfOrigin", "State of Origin").required())
            .field(FieldSpec::select("maritalStatus", "Marital Status", MARITAL_STATUSES).required())
            .rule(Rule::required("Please fill all required personal info fields.")),
        Step::new("Account Credentials", "Account Credentials")
            .field(FieldSpec::text("username", "Username").required())
            .field(FieldSpec::text("password", "Password").required().masked())
            .field(FieldSpec::text("confirmPassword", "Confirm Password").required().masked())
            .field(FieldSpec::text("otpPreference", "2FA/OTP Preference (optional)"))
            .rule(Rule::required("Please fill all required account fields."))
            .rule(Rule::equal("password", "confirmPassword", "Passwords do not match.")),
        Step::new("Emergency Contact", "Emergency Contact")
            .field(FieldSpec::text("emergencyName", "Full Name").required())
            .field(FieldSpec::text("emergencyRelationship", "Relationship").required())
            .field(FieldSpec::text("emergencyPhone", "Phone Number").required())
            .field(FieldSpec::text("emergencyAddress", "Address (optional)"))
            .rule(Rule::required("Please fill all required emergency contact fields.")),
        Step::new("Medical History", "Medical History")
            .field(FieldSpec::text("allergies", "Allergies"))
            .field(FieldSpec::text("chronicConditions", "Chronic Conditions"))
            .field(FieldSpec::text("pastSurgeries", "Past Surgeries or Hospitalizations"))
            .field(FieldSpec::text("medications", "Current Medications"))
            .field(FieldSpec::text("familyHistory", "Family Medical History")),
        Step::new("Health & Lifestyle", "Health Preferences & Lifestyle")
            .field(FieldSpec::select("bloodGroup", "Blood Group", BLOOD_GROUPS))
            .field(FieldSpec::numeric("height", "Height (cm)"))
            .field(FieldSpec::numeric("weight", "Weight (kg)"))
            .field(FieldSpec::text("smoking", "Smoking (Yes/No)"))
            .field(FieldSpec::text("alcohol", "Alcohol Usage (Yes/No)"))
            .field(FieldSpec::text("preferredLanguage", "Preferred Language"))
            .field(FieldSpec::select(
                "preferredDoctorGender",
                "Preferred Doctor Gender",
                GENDERS,
            ))
            .field(FieldSpec::select(
                "preferredConsultType",
                "Preferred Consultation Type",
                CONSULT_TYPES,
            )),
        Step::new("Insurance Info", "Insurance Information")
            .field(FieldSpec::select("hasInsurance", "Do you have health insurance?", YES_NO))
            .field(FieldSpec::text("insuranceProvider", "Insurance Provider"))
            .field(FieldSpec::text("insuranceNumber", "Insurance Number / ID"))
            .field(FieldSpec::date("insuranceExpiry", "Expiry Date"))
            .field(FieldSpec::file(
                "insuranceCard",
                "Upload Insurance Card (optional)",
                IMAGE_OR_PDF,
            )),
        Step::new("Payment Preferences", "Payment Preferences")
            .field(FieldSpec::select(
                "paymentMethod",
                "Preferred Payment Method",
                PAYMENT_METHODS,
            ))
            .field(FieldSpec::text("cardDetails", "Card Details").masked())
            .field(FieldSpec::text("bankDetails", "Bank Details").masked()),
        Step::new("Consent & Agreements", "Consent & Agreements")
            .field(FieldSpec::checkbox("terms", "I agree to the Terms and Conditions"))
            .field(FieldSpec::checkbox("privacy", "I acknowledge the Privacy Policy"))
            .field(FieldSpec::checkbox(
                "dataConsent",
                "I consent to the use of my medical data",
            ))
            .field(FieldSpec::checkbox(
                "emergencyConsent",
                "I consent to emergency contact notification",
            ))
            .rule(Rule::all_checked(
                &["terms", "privacy", "dataConsent", "emergencyConsent"],
                "Please accept all consents and agreements.",
            )),
        Step::new("Documents Upload", "Optional Documents Upload")
            .field(FieldSpec::file("govId", "Upload Government-Issued ID", IMAGE_OR_PDF))
            .field(FieldSpec::file(
                "insuranceCardUpload",
                "Upload Insurance Card",
                IMAGE_OR_PDF,
            ))
            .field(FieldSpec::file(
                "passportPhoto",
                "Upload Passport Photo (optional)",
                IMAGE,
            )),
        Step::new("Review & Submit", "Review & Submit")
            .field(FieldSpec::checkbox(
                "reviewConfirm",
                "I confirm the above information is accurate",
            ))
            .rule(Rule::all_checked(
                &["reviewConfirm"],
                "Please confirm the above information is accurate.",
            )),
    ];

    WizardDefinition::new(Role::Patient, "Patient Onboarding", PATIENT_ENDPOINT, steps)
}

pub fn doctor() -> Result<WizardDefinition, ConfigError> {
    let steps = vec![
        Step::new("Personal Info", "Personal Information")
            .field(FieldSpec::file("profilePicture", "Upload Photo", IMAGE))
            .field(FieldSpec::text("fullName", "Full Name").required())
            .field(FieldSpec::select("gender", "Gender", GENDERS).required())
            .field(FieldSpec::date("dob", "Date of Birth").required())
            .field(FieldSpec::text("phone", "Phone Number").required())
            .field(FieldSpec::text("email", "Email Address").required())
            .rule(Rule::required("Please fill all required personal info fields.")),
        Step::new("Professional Credentials", "Professional Details")
            .field(FieldSpec::text("specialty", "Medical Specialty").required())
            .field(FieldSpec::numeric("yearsOfExperience", "Years of Experience").required())
            .field(FieldSpec::text("qualifications", "Qualifications / Degrees").required())
            .field(FieldSpec::text("licenseNumber", "Medical License Number").required())
            .field(FieldSpec::text("issuingCouncil", "Issuing Medical Council/Board").required())
            .field(FieldSpec::text("licenseCountry", "Country/State of License").required())
            .field(FieldSpec::text("certifications", "Certifications (optional)"))
            .rule(Rule::required("Please fill all required professional fields.")),
        Step::new("Upload Docs", "Identity & Document Verification")
            .field(FieldSpec::file("govId", "Upload Government ID", IMAGE_OR_PDF).required())
            .field(
                FieldSpec::file("licenseUpload", "Upload Medical License", IMAGE_OR_PDF).required(),
            )
            .field(FieldSpec::file("passportPhoto", "Upload Passport-style Photo", IMAGE).required())
            .field(FieldSpec::file("videoBio", "Upload Video Bio (optional)", VIDEO))
            .rule(Rule::required("Please upload all required documents.")),
        Step::new("Schedule Availability", "Clinic / Practice Info")
            .field(FieldSpec::text("employer", "Current Employer / Practice"))
            .field(FieldSpec::text("clinicAddress", "Clinic Address"))
            .field(FieldSpec::text("workingHours", "Working Hours / Availability"))
            .field(FieldSpec::numeric("consultationFee", "Consultation Fee")),
        Step::new("Bank Info", "Bank / Payment Info")
            .field(FieldSpec::text("bankAccountName", "Bank Account Name").required())
            .field(
                FieldSpec::text("bankAccountNumber", "Bank Account Number")
                    .required()
                    .masked(),
            )
            .field(FieldSpec::text("bankName", "Bank Name").required())
            .field(FieldSpec::text("bvn", "BVN / NIN").masked())
            .field(
                FieldSpec::select("payoutFrequency", "Preferred Payout Frequency", PAYOUT_FREQUENCIES)
                    .required(),
            )
            .rule(Rule::required("Please fill all required bank info fields.")),
        Step::new("Review & Submit", "System Preferences & Credentials")
            .field(FieldSpec::text("preferredLanguage", "Preferred Language").required())
            .field(FieldSpec::text("timeZone", "Time Zone").required())
            .field(FieldSpec::multi_select(
                "notificationPreferences",
                "Notification Preferences",
                NOTIFICATION_CHANNELS,
            ))
            .field(FieldSpec::text("username", "Username").required())
            .field(FieldSpec::text("password", "Password").required().masked())
            .field(FieldSpec::checkbox("consent", "I consent to the Terms and Privacy Policy").required())
            .rule(Rule::required("Please complete all required fields and accept terms.")),
    ];

    WizardDefinition::new(Role::Doctor, "Doctor Onboarding", DOCTOR_ENDPOINT, steps)
}
